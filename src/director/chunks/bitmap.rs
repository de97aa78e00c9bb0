use binary_reader::BinaryReader;

/// `BITD`: raw (usually RLE-packed) pixel data for a bitmap member. The
/// dimensions and depth live in the owning `CASt`; decode is left to the
/// rasterising host, so the payload is kept verbatim.
#[derive(Debug)]
pub struct BitmapChunk {
    pub data: Vec<u8>,
}

impl BitmapChunk {
    pub fn from_reader(
        reader: &mut BinaryReader,
        _dir_version: u16,
    ) -> Result<BitmapChunk, crate::director::file::FileError> {
        use crate::io::reader::DirectorExt;
        let remaining = reader.bytes_left();
        let data = reader.try_read_bytes(remaining)?;
        Ok(BitmapChunk { data })
    }
}
