//! Binary restart streams.
//!
//! Everything is written little-endian with fixed widths so a file does not
//! depend on the machine or on how the run was split into subdomains.

use std::io::{self, Read, Write};

use crate::Error;

pub struct RestartWriter<W: Write> {
    inner: W,
}
impl<W: Write> RestartWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }
    pub fn into_inner(self) -> W {
        self.inner
    }
    pub fn write_u64(&mut self, value: u64) -> Result<(), Error> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }
    pub fn write_usize(&mut self, value: usize) -> Result<(), Error> {
        self.write_u64(value as u64)
    }
    pub fn write_bool(&mut self, value: bool) -> Result<(), Error> {
        self.inner.write_all(&[value as u8])?;
        Ok(())
    }
    pub fn write_f64(&mut self, value: f64) -> Result<(), Error> {
        self.inner.write_all(&value.to_le_bytes())?;
        Ok(())
    }
    pub fn write_f64_slice(&mut self, values: &[f64]) -> Result<(), Error> {
        for v in values {
            self.write_f64(*v)?;
        }
        Ok(())
    }
    /// Length-prefixed UTF-8
    pub fn write_str(&mut self, value: &str) -> Result<(), Error> {
        self.write_usize(value.len())?;
        self.inner.write_all(value.as_bytes())?;
        Ok(())
    }
}

pub struct RestartReader<R: Read> {
    inner: R,
}
impl<R: Read> RestartReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
    fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => {
                Error::restart(format!("{} more bytes", buf.len()), "end of file")
            }
            _ => Error::Io(e),
        })
    }
    pub fn read_u64(&mut self) -> Result<u64, Error> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }
    pub fn read_usize(&mut self) -> Result<usize, Error> {
        let value = self.read_u64()?;
        usize::try_from(value).map_err(|_| Error::restart("a size", value))
    }
    pub fn read_bool(&mut self) -> Result<bool, Error> {
        let mut buf = [0u8; 1];
        self.read_exact(&mut buf)?;
        match buf[0] {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(Error::restart("a flag (0 or 1)", b)),
        }
    }
    pub fn read_f64(&mut self) -> Result<f64, Error> {
        let mut buf = [0u8; 8];
        self.read_exact(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }
    pub fn read_f64_vec(&mut self, len: usize) -> Result<Vec<f64>, Error> {
        (0..len).map(|_| self.read_f64()).collect()
    }
    pub fn read_string(&mut self) -> Result<String, Error> {
        let len = self.read_usize()?;
        let mut buf = vec![0u8; len];
        self.read_exact(&mut buf)?;
        String::from_utf8(buf).map_err(|_| Error::restart("UTF-8 text", "invalid bytes"))
    }
    /// Read a size and fail unless it equals `expected`
    pub fn expect_usize(&mut self, what: &str, expected: usize) -> Result<(), Error> {
        let found = self.read_usize()?;
        if found != expected {
            return Err(Error::restart(
                format!("{} {}", expected, what),
                format!("{} {}", found, what),
            ));
        }
        Ok(())
    }
    pub fn expect_str(&mut self, what: &str, expected: &str) -> Result<(), Error> {
        let found = self.read_string()?;
        if found != expected {
            return Err(Error::restart(
                format!("{} '{}'", what, expected),
                format!("{} '{}'", what, found),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_stream_is_a_format_error() {
        let mut out = RestartWriter::new(Vec::new());
        out.write_str("harmonic").unwrap();
        let mut bytes = out.into_inner();
        bytes.truncate(10);

        let err = RestartReader::new(bytes.as_slice()).read_string().unwrap_err();
        assert!(matches!(err, Error::RestartFormat { .. }));
    }

    #[test]
    fn mismatched_header() {
        let mut out = RestartWriter::new(Vec::new());
        out.write_str("zero").unwrap();
        out.write_usize(2).unwrap();
        let bytes = out.into_inner();

        let mut input = RestartReader::new(bytes.as_slice());
        assert!(input.expect_str("bond style", "harmonic").is_err());
        assert!(input.expect_usize("types", 3).is_err());
    }
}
