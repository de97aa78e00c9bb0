use crate::{
    director::lingo::datum::{
        Datum, StringChunkExpr, StringChunkSource, StringChunkType,
    },
    vm::{cast_member::CastMemberType, datum_ref::DatumRef, LingoVm, ScriptError},
};

pub struct StringChunkUtils {}

impl StringChunkUtils {
    /// Splits a string into its chunks of the given type. Items keep empty
    /// entries; words collapse whitespace.
    pub fn resolve_chunk_list(
        string: &str,
        chunk_type: StringChunkType,
        item_delimiter: char,
    ) -> Result<Vec<String>, ScriptError> {
        let chunks = match chunk_type {
            StringChunkType::Char => string.chars().map(|c| c.to_string()).collect(),
            StringChunkType::Word => string
                .split_whitespace()
                .map(|word| word.to_string())
                .collect(),
            StringChunkType::Item => string
                .split(item_delimiter)
                .map(|item| item.to_string())
                .collect(),
            StringChunkType::Line => string
                .split(['\r', '\n'])
                .map(|line| line.to_string())
                .collect(),
        };
        Ok(chunks)
    }

    /// Resolves a 1-indexed chunk range. Bounds past the end clamp to the
    /// string length; `end == 0` selects a single chunk.
    pub fn resolve_chunk_expr_string(
        string: &str,
        expr: &StringChunkExpr,
    ) -> Result<String, ScriptError> {
        let chunks = Self::resolve_chunk_list(string, expr.chunk_type, expr.item_delimiter)?;
        let count = chunks.len() as i32;
        if count == 0 {
            return Ok(String::new());
        }
        let start = expr.start.clamp(1, count);
        let end = if expr.end == 0 {
            start
        } else {
            expr.end.clamp(start, count)
        };
        let selected = &chunks[(start - 1) as usize..end as usize];
        let joined = match expr.chunk_type {
            StringChunkType::Char => selected.concat(),
            StringChunkType::Word => selected.join(" "),
            StringChunkType::Item => selected.join(&expr.item_delimiter.to_string()),
            StringChunkType::Line => selected.join("\r"),
        };
        Ok(joined)
    }

    /// `the last word of`-style access.
    pub fn resolve_last_chunk(
        string: &str,
        chunk_type: StringChunkType,
        item_delimiter: char,
    ) -> Result<String, ScriptError> {
        let chunks = Self::resolve_chunk_list(string, chunk_type, item_delimiter)?;
        Ok(chunks.last().cloned().unwrap_or_default())
    }

    fn splice(
        string: &str,
        expr: &StringChunkExpr,
        replacement: Option<&str>,
    ) -> Result<String, ScriptError> {
        let chunks = Self::resolve_chunk_list(string, expr.chunk_type, expr.item_delimiter)?;
        let count = chunks.len() as i32;
        if count == 0 {
            return Ok(replacement.unwrap_or("").to_string());
        }
        let start = expr.start.clamp(1, count);
        let end = if expr.end == 0 {
            start
        } else {
            expr.end.clamp(start, count)
        };

        let separator = match expr.chunk_type {
            StringChunkType::Char => String::new(),
            StringChunkType::Word => " ".to_string(),
            StringChunkType::Item => expr.item_delimiter.to_string(),
            StringChunkType::Line => "\r".to_string(),
        };

        let mut parts: Vec<String> = Vec::new();
        parts.extend_from_slice(&chunks[..(start - 1) as usize]);
        if let Some(replacement) = replacement {
            parts.push(replacement.to_string());
        }
        parts.extend_from_slice(&chunks[end as usize..]);
        Ok(parts.join(&separator))
    }

    /// Writes a replacement through to the chunk's source variable or
    /// field member.
    pub fn put(
        vm: &mut LingoVm,
        source: &StringChunkSource,
        expr: &StringChunkExpr,
        replacement: &str,
    ) -> Result<(), ScriptError> {
        match source {
            StringChunkSource::Datum(source_ref) => {
                let original = vm.get_datum(source_ref).string_value()?;
                let new_string = Self::splice(&original, expr, Some(replacement))?;
                let target = vm.get_datum_mut(source_ref);
                *target = Datum::String(new_string);
                Ok(())
            }
            StringChunkSource::Member(member_ref) => {
                let member = vm
                    .movie
                    .cast_manager
                    .find_mut_member_by_ref(member_ref)
                    .ok_or_else(|| ScriptError::new("Field member not found".to_string()))?;
                match &mut member.member_type {
                    CastMemberType::Field(field) => {
                        field.text = Self::splice(&field.text.clone(), expr, Some(replacement))?;
                        Ok(())
                    }
                    CastMemberType::Text(text) => {
                        text.text = Self::splice(&text.text.clone(), expr, Some(replacement))?;
                        Ok(())
                    }
                    _ => Err(ScriptError::new(
                        "Chunk target is not a field".to_string(),
                    )),
                }
            }
        }
    }

    pub fn delete(
        vm: &mut LingoVm,
        source: &StringChunkSource,
        expr: &StringChunkExpr,
    ) -> Result<(), ScriptError> {
        match source {
            StringChunkSource::Datum(source_ref) => {
                let original = vm.get_datum(source_ref).string_value()?;
                let new_string = Self::splice(&original, expr, None)?;
                let target = vm.get_datum_mut(source_ref);
                *target = Datum::String(new_string);
                Ok(())
            }
            StringChunkSource::Member(member_ref) => {
                let member = vm
                    .movie
                    .cast_manager
                    .find_mut_member_by_ref(member_ref)
                    .ok_or_else(|| ScriptError::new("Field member not found".to_string()))?;
                match &mut member.member_type {
                    CastMemberType::Field(field) => {
                        field.text = Self::splice(&field.text.clone(), expr, None)?;
                        Ok(())
                    }
                    CastMemberType::Text(text) => {
                        text.text = Self::splice(&text.text.clone(), expr, None)?;
                        Ok(())
                    }
                    _ => Err(ScriptError::new(
                        "Chunk target is not a field".to_string(),
                    )),
                }
            }
        }
    }
}

pub struct StringChunkHandlers {}

impl StringChunkHandlers {
    pub fn call(
        vm: &mut LingoVm,
        datum: &DatumRef,
        handler_name: &str,
        args: &[DatumRef],
    ) -> Result<DatumRef, ScriptError> {
        // chunk datums answer the plain string methods on their resolved
        // value
        let resolved = vm.get_datum(datum).string_value()?;
        let string_ref = vm.alloc_datum(Datum::String(resolved));
        super::string::StringDatumHandlers::call(vm, &string_ref, handler_name, args)
    }
}
