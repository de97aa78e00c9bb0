mod common;

use common::{
    build_afterburner, build_cast_assoc, build_cast_list, build_config, build_field_cast_member,
    build_key_table, build_uncompressed, write_var_int,
};
use shockvm::director::file::{read_director_file_bytes, FileError};
use shockvm::vm::cast_member::CastMemberType;

/// Decoding matches the wire encoding byte-for-byte for the VLI scheme.
#[test]
fn var_int_encoding_round_trips() {
    use binary_reader::BinaryReader;
    use shockvm::io::reader::DirectorExt;

    for value in [0u32, 1, 0x7f, 0x80, 0xa3, 0x3fff, 0x4000, 1_000_000] {
        let mut encoded = Vec::new();
        write_var_int(&mut encoded, value);
        let mut reader = BinaryReader::from_vec(&encoded);
        reader.set_endian(binary_reader::Endian::Big);
        assert_eq!(reader.read_var_int().unwrap(), value as i32, "value {value}");
        assert_eq!(reader.pos, encoded.len(), "value {value} left trailing bytes");
    }
}

#[test]
fn loads_a_synthetic_afterburner_movie() {
    let _ = env_logger::builder().is_test(true).try_init();
    let key_table = build_key_table(&[]);
    let config = build_config();
    let cast_member = build_field_cast_member("greeting");
    let cast_assoc = build_cast_assoc(&[6]);

    let movie_bytes = build_afterburner(&[
        (3, "KEY*", key_table),
        (4, "DRCF", config),
        (5, "CAS*", cast_assoc),
        (6, "CASt", cast_member.clone()),
    ]);

    let file = read_director_file_bytes(&movie_bytes, "test.dcr").unwrap();
    assert!(file.after_burned);
    assert_eq!(file.version, 500);

    // chunk map: every live resource id resolves to its payload in O(1)
    assert_eq!(file.chunk_bytes(6).unwrap(), &cast_member);

    // the implicit internal cast carries the field member at slot 1
    assert_eq!(file.casts.len(), 1);
    let cast = &file.casts[0];
    let member = cast.members.get(&1).expect("member slot 1");
    assert_eq!(
        member.chunk.member_info.as_ref().unwrap().name,
        "greeting"
    );
}

#[test]
fn movie_loads_into_the_cast_model() {
    let movie_bytes = build_afterburner(&[
        (3, "KEY*", build_key_table(&[])),
        (4, "DRCF", build_config()),
        (5, "CAS*", build_cast_assoc(&[6])),
        (6, "CASt", build_field_cast_member("greeting")),
    ]);

    let file = read_director_file_bytes(&movie_bytes, "test.dcr").unwrap();
    let mut vm = shockvm::vm::LingoVm::new();
    vm.load_movie(&file);

    let member_ref = vm
        .movie
        .cast_manager
        .find_member_ref_by_name("greeting")
        .expect("member by name");
    let member = vm.movie.cast_manager.find_member_by_ref(&member_ref).unwrap();
    assert!(matches!(member.member_type, CastMemberType::Field(_)));
}

/// The compressed and uncompressed renditions of the same movie decode to
/// equal cast-member lists.
#[test]
fn dcr_and_dir_renditions_agree() {
    let key_table = build_key_table(&[]);
    let config = build_config();
    let cast_member = build_field_cast_member("greeting");
    let cast_assoc = build_cast_assoc(&[6]);

    let compressed = build_afterburner(&[
        (3, "KEY*", key_table.clone()),
        (4, "DRCF", config.clone()),
        (5, "CAS*", cast_assoc.clone()),
        (6, "CASt", cast_member.clone()),
    ]);
    let uncompressed = build_uncompressed(&[
        ("KEY*", key_table),
        ("DRCF", config),
        ("CAS*", cast_assoc),
        ("CASt", cast_member),
    ]);

    let from_dcr = read_director_file_bytes(&compressed, "movie.dcr").unwrap();
    let from_dir = read_director_file_bytes(&uncompressed, "movie.dir").unwrap();
    assert!(from_dcr.after_burned);
    assert!(!from_dir.after_burned);
    assert_eq!(from_dcr.version, from_dir.version);

    assert_eq!(from_dcr.casts.len(), from_dir.casts.len());
    for (left, right) in from_dcr.casts.iter().zip(from_dir.casts.iter()) {
        assert_eq!(left.members.len(), right.members.len());
        for (slot, member) in &left.members {
            let other = right.members.get(slot).expect("member slot present");
            assert_eq!(
                member.chunk.member_info.as_ref().map(|info| &info.name),
                other.chunk.member_info.as_ref().map(|info| &info.name),
            );
        }
    }
}

#[test]
fn truncated_input_is_rejected() {
    let movie_bytes = build_afterburner(&[
        (3, "KEY*", build_key_table(&[])),
        (4, "DRCF", build_config()),
    ]);
    let result = read_director_file_bytes(&movie_bytes[..20], "test.dcr");
    assert!(result.is_err());
}

#[test]
fn garbage_codec_is_rejected() {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&u32::to_be_bytes(shockvm::director::utils::FOURCC("RIFX")));
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    bytes.extend_from_slice(b"WAT?");
    match read_director_file_bytes(&bytes, "test.dcr") {
        Err(FileError::UnsupportedCodec(_)) => {}
        other => panic!("expected UnsupportedCodec, got {other:?}"),
    }
}

#[test]
fn missing_ils_entry_is_malformed_abmp() {
    // a movie whose ABMP lacks the ILS meta entry is unusable
    let key_table = build_key_table(&[]);
    let movie_bytes = build_afterburner(&[(3, "KEY*", key_table)]);

    // strip resource 2 by rebuilding with an impossible id is intricate;
    // instead corrupt the FGEI tag so the loader reports the failure
    let mut corrupted = movie_bytes.clone();
    let fgei = u32::to_be_bytes(shockvm::director::utils::FOURCC("FGEI"));
    if let Some(pos) = corrupted
        .windows(4)
        .rposition(|window| window == fgei)
    {
        corrupted[pos..pos + 4].copy_from_slice(b"XXXX");
    }
    assert!(read_director_file_bytes(&corrupted, "test.dcr").is_err());
}

#[test]
fn cast_list_chunk_decodes() {
    use binary_reader::BinaryReader;
    use shockvm::director::chunks::cast_list::CastListChunk;

    let bytes = build_cast_list("sprites", "assets:casts:sprites.cst", 2, 1025);
    let mut reader = BinaryReader::from_vec(&bytes);
    reader.set_endian(binary_reader::Endian::Big);
    let chunk = CastListChunk::from_reader(&mut reader, 500, binary_reader::Endian::Big).unwrap();
    assert_eq!(chunk.entries.len(), 1);
    let entry = &chunk.entries[0];
    assert_eq!(entry.name, "sprites");
    assert_eq!(entry.file_path, "assets:casts:sprites.cst");
    assert_eq!(entry.preload_settings, 2);
    assert_eq!(entry.min_member, 1);
    assert_eq!(entry.id, 1025);
}
