//! Reading and writing whole documents.

use std::io::{Read, Write};

use blueprint_core::{Error, Result};
use quartz_nbt::io::{Flavor, NbtIoError};
use quartz_nbt::NbtCompound;

/// Parse a root compound from `reader`.
pub fn read_document<R: Read>(reader: &mut R, flavor: Flavor) -> Result<NbtCompound> {
    let (document, _root_name) = quartz_nbt::io::read_nbt(reader, flavor).map_err(into_error)?;
    Ok(document)
}

/// Serialise `document` as an unnamed root compound.
pub fn write_document<W: Write>(
    writer: &mut W,
    document: &NbtCompound,
    flavor: Flavor,
) -> Result<()> {
    quartz_nbt::io::write_nbt(writer, None, document, flavor).map_err(into_error)
}

/// Stream failures stay I/O errors; everything else is a malformed document.
fn into_error(err: NbtIoError) -> Error {
    match err {
        NbtIoError::StdIo(io) => Error::Io(io),
        other => Error::Nbt(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quartz_nbt::NbtTag;
    use std::io::Cursor;

    #[test]
    fn document_survives_write_and_read() {
        let mut doc = NbtCompound::new();
        doc.insert("Width", NbtTag::Short(3));
        doc.insert("Blocks", NbtTag::ByteArray(vec![1, 2, 3]));

        let mut bytes = Vec::new();
        write_document(&mut bytes, &doc, Flavor::Uncompressed).unwrap();
        let back = read_document(&mut Cursor::new(bytes), Flavor::Uncompressed).unwrap();

        assert_eq!(crate::get::<i16>(&back, "Width").unwrap(), 3);
        assert_eq!(crate::get::<Vec<u8>>(&back, "Blocks").unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn truncated_input_is_io_error() {
        let err = read_document(&mut Cursor::new(vec![10u8, 0]), Flavor::Uncompressed).unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::UnexpectedEof));
    }

    #[test]
    fn non_compound_root_is_nbt_error() {
        // A byte tag with an empty name where the root compound should be.
        let bytes = vec![1u8, 0, 0, 5];
        let err = read_document(&mut Cursor::new(bytes), Flavor::Uncompressed).unwrap_err();
        assert!(matches!(err, Error::Nbt(_)));
    }

    #[test]
    fn failing_writer_is_io_error() {
        struct Full;

        impl Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::ErrorKind::WriteZero.into())
            }

            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut doc = NbtCompound::new();
        doc.insert("Width", NbtTag::Short(1));
        let err = write_document(&mut Full, &doc, Flavor::Uncompressed).unwrap_err();
        assert!(matches!(err, Error::Io(e) if e.kind() == std::io::ErrorKind::WriteZero));
    }
}
