use std::io::Read;

use binary_reader::BinaryReader;

use crate::director::file::FileError;

/// Director-specific decoding on top of [`BinaryReader`].
///
/// Multi-byte integers follow the endian configured on the reader; FourCC
/// tags are always read big-endian by the callers.
pub trait DirectorExt {
    /// Variable-length integer: 7 payload bits per byte, continuation bit
    /// 0x80, terminated at the first byte with the continuation bit clear.
    fn read_var_int(&mut self) -> Result<i32, FileError>;
    fn read_zlib_bytes(&mut self, length: usize) -> Result<Vec<u8>, FileError>;
    fn read_pascal_string(&mut self) -> Result<String, FileError>;
    fn read_string(&mut self, len: usize) -> Result<String, FileError>;
    fn read_apple_float_80(&mut self) -> Result<f64, FileError>;
    fn try_read_u8(&mut self) -> Result<u8, FileError>;
    fn try_read_u16(&mut self) -> Result<u16, FileError>;
    fn try_read_u32(&mut self) -> Result<u32, FileError>;
    fn try_read_i16(&mut self) -> Result<i16, FileError>;
    fn try_read_i32(&mut self) -> Result<i32, FileError>;
    fn try_read_bytes(&mut self, len: usize) -> Result<Vec<u8>, FileError>;
    fn eof(&self) -> bool;
    fn bytes_left(&self) -> usize;
}

impl DirectorExt for BinaryReader {
    fn read_var_int(&mut self) -> Result<i32, FileError> {
        let mut val: i32 = 0;
        loop {
            let b = self.try_read_u8()?;
            // low 7 bits are appended; high bit means another byte follows
            val = (val << 7) | ((b & 0x7f) as i32);
            if b & 0x80 == 0 {
                break;
            }
        }
        Ok(val)
    }

    fn bytes_left(&self) -> usize {
        self.length.saturating_sub(self.pos)
    }

    fn read_zlib_bytes(&mut self, length: usize) -> Result<Vec<u8>, FileError> {
        let compressed = self.try_read_bytes(length)?;
        let mut decompressed = Vec::new();
        let mut decoder = flate2::read::ZlibDecoder::new(&compressed[..]);
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|_| FileError::BadCompression { resource_id: 0 })?;
        Ok(decompressed)
    }

    fn read_pascal_string(&mut self) -> Result<String, FileError> {
        let len = self.try_read_u8()? as usize;
        self.read_string(len)
    }

    fn read_string(&mut self, len: usize) -> Result<String, FileError> {
        let bytes = self.try_read_bytes(len)?;
        // Director strings are MacRoman/latin-ish byte soup; keep the bytes
        // as-is in a lossy UTF-8 view.
        Ok(bytes.iter().map(|&b| b as char).collect())
    }

    fn read_apple_float_80(&mut self) -> Result<f64, FileError> {
        // 80-bit SANE extended: 1 sign + 15 exponent + 64 fraction bits.
        let data = self.try_read_bytes(10)?;
        let exponent = u16::from_be_bytes([data[0], data[1]]);
        let f64sign: u64 = ((exponent & 0x8000) as u64) << 48;
        let exponent = exponent & 0x7fff;

        let mut fraction = u64::from_be_bytes([
            data[2], data[3], data[4], data[5], data[6], data[7], data[8], data[9],
        ]);
        fraction &= 0x7fffffffffffffff;

        let f64exp: u64 = if exponent == 0 {
            0
        } else if exponent == 0x7fff {
            0x7ff
        } else {
            let normexp = exponent as i64 - 0x3fff;
            if !(-0x3fe..0x3ff).contains(&normexp) {
                return Err(FileError::Corrupt(
                    "float exponent too big for a double".to_string(),
                ));
            }
            (normexp + 0x3ff) as u64
        };
        let f64bin = f64sign | (f64exp << 52) | (fraction >> 11);
        Ok(f64::from_bits(f64bin))
    }

    fn try_read_u8(&mut self) -> Result<u8, FileError> {
        self.read_u8().map_err(|_| FileError::TruncatedInput)
    }

    fn try_read_u16(&mut self) -> Result<u16, FileError> {
        self.read_u16().map_err(|_| FileError::TruncatedInput)
    }

    fn try_read_u32(&mut self) -> Result<u32, FileError> {
        self.read_u32().map_err(|_| FileError::TruncatedInput)
    }

    fn try_read_i16(&mut self) -> Result<i16, FileError> {
        self.read_i16().map_err(|_| FileError::TruncatedInput)
    }

    fn try_read_i32(&mut self) -> Result<i32, FileError> {
        self.read_i32().map_err(|_| FileError::TruncatedInput)
    }

    fn try_read_bytes(&mut self, len: usize) -> Result<Vec<u8>, FileError> {
        self.read_bytes(len)
            .map(|b| b.to_vec())
            .map_err(|_| FileError::TruncatedInput)
    }

    fn eof(&self) -> bool {
        self.pos >= self.length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(bytes: &[u8]) -> BinaryReader {
        let mut r = BinaryReader::from_u8(bytes);
        r.set_endian(binary_reader::Endian::Big);
        r
    }

    #[test]
    fn var_int_single_byte() {
        let mut r = reader(&[0x05]);
        assert_eq!(r.read_var_int().unwrap(), 5);
    }

    #[test]
    fn var_int_two_bytes() {
        // 0x81 0x23 -> (1 << 7) | 0x23 = 0xa3
        let mut r = reader(&[0x81, 0x23]);
        assert_eq!(r.read_var_int().unwrap(), 0xa3);
    }

    #[test]
    fn var_int_truncated() {
        let mut r = reader(&[0x81]);
        assert!(matches!(r.read_var_int(), Err(FileError::TruncatedInput)));
    }

    #[test]
    fn zlib_roundtrip() {
        use std::io::Write;
        let mut enc =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(b"lingo").unwrap();
        let compressed = enc.finish().unwrap();
        let len = compressed.len();
        let mut r = reader(&compressed);
        assert_eq!(r.read_zlib_bytes(len).unwrap(), b"lingo");
    }
}
