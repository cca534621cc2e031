const BUFFER_SIZE: usize = 1024 * 1024;

/// Reads an archive stream and allows pulling a specified number of bits.
/// Bits come out of each byte LSB-first, mirroring the writer; `read_bits`
/// assembles fixed-width fields most-significant bit first.
#[derive(Debug)]
pub struct BitReader<R> {
    buffer: Vec<u8>,
    byte_index: usize,
    bit_index: usize,
    source: R,
}

impl<R: std::io::Read> BitReader<R> {
    /// Called to create a new BitReader over any byte source.
    pub fn new(source: R) -> Self {
        Self {
            buffer: vec![0; BUFFER_SIZE],
            byte_index: BUFFER_SIZE,
            bit_index: 0,
            source,
        }
    }

    /// Check (and refill) the buffer - true if we have data, false if there
    /// is no more.
    fn have_data(&mut self) -> std::io::Result<bool> {
        if self.byte_index == self.buffer.len() {
            self.buffer.resize(BUFFER_SIZE, 0);
            let size = self.source.read(&mut self.buffer)?;
            if size == 0 {
                self.buffer.clear();
                self.byte_index = 0;
                return Ok(false);
            }
            self.buffer.truncate(size);
            self.byte_index = 0;
            self.bit_index = 0;
        }
        Ok(true)
    }

    /// True if at least one more byte can be read. Used by the container
    /// loops to detect a clean end of the archive between chunks.
    pub fn has_data(&mut self) -> std::io::Result<bool> {
        if self.byte_index < self.buffer.len() {
            return Ok(true);
        }
        self.have_data()
    }

    /// Return one bit, or None if there is no more data to read.
    pub fn bit(&mut self) -> std::io::Result<Option<u8>> {
        if self.bit_index == 0 && !self.have_data()? {
            return Ok(None);
        }
        let bit = (self.buffer[self.byte_index] >> self.bit_index) & 1;
        self.bit_index += 1;
        if self.bit_index == 8 {
            self.bit_index = 0;
            self.byte_index += 1;
        }
        Ok(Some(bit))
    }

    /// Return the next n bits as one value, first bit read in the most
    /// significant position. None if the stream runs dry first.
    pub fn read_bits(&mut self, n: u32) -> std::io::Result<Option<u64>> {
        let mut result = 0_u64;
        for _ in 0..n {
            match self.bit()? {
                Some(bit) => result = result << 1 | bit as u64,
                None => return Ok(None),
            }
        }
        Ok(Some(result))
    }

    /// Skip the rest of the current byte (the writer padded it with 1s).
    pub fn align(&mut self) {
        if self.bit_index != 0 {
            self.bit_index = 0;
            self.byte_index += 1;
        }
    }

    /// Read an aligned byte.
    pub fn byte(&mut self) -> std::io::Result<Option<u8>> {
        self.align();
        if !self.have_data()? {
            return Ok(None);
        }
        let byte = self.buffer[self.byte_index];
        self.byte_index += 1;
        Ok(Some(byte))
    }

    /// Read n aligned bytes; None if fewer are available.
    pub fn bytes(&mut self, n: usize) -> std::io::Result<Option<Vec<u8>>> {
        let mut result = Vec::with_capacity(n);
        for _ in 0..n {
            match self.byte()? {
                Some(byte) => result.push(byte),
                None => return Ok(None),
            }
        }
        Ok(Some(result))
    }
}
