use binary_reader::{BinaryReader, Endian};

use super::reader::DirectorExt;

/// Helpers for the offset-table list layout shared by `MCsL`-style chunks:
/// each item is a standalone byte buffer addressed by index. Missing or
/// empty items decode to a zero value rather than an error.
pub fn read_pascal_string(item_bufs: &[Vec<u8>], index: usize, item_endian: Endian) -> String {
    if index >= item_bufs.len() {
        return String::new();
    }

    let mut reader = BinaryReader::from_vec(&item_bufs[index]);
    reader.set_endian(item_endian);

    if reader.length == 0 {
        return String::new();
    }

    reader.read_pascal_string().unwrap_or_default()
}

pub fn read_u16(item_bufs: &[Vec<u8>], index: usize, item_endian: Endian) -> u16 {
    if index >= item_bufs.len() || item_bufs[index].len() < 2 {
        return 0;
    }

    let mut reader = BinaryReader::from_vec(&item_bufs[index]);
    reader.set_endian(item_endian);
    reader.try_read_u16().unwrap_or(0)
}
