//! Transparent compression for input and output files.
//!
//! Inputs are decompressed when their extension or leading magic bytes identify a
//! [`Codec`]; outputs are compressed when their extension does. Each codec sits behind
//! a cargo feature:
//! - **Gzip** (`.gz`) via `flate2` (feature: `compression-gzip`)
//! - **Zstd** (`.zst`) via `zstd` (feature: `compression-zstd`)
//! - **Bzip2** (`.bz2`) via `bzip2` (feature: `compression-bzip2`)
//! - **Xz** (`.xz`) via `xz2` (feature: `compression-xz`)
//!
//! Output streams are [`FinishWrite`] sinks. Encoders hold their last block and trailer
//! until finished, so the output is complete only once `finish` has returned `Ok`.

use anyhow::{Context, Result};
use log::debug;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

/// A byte sink with an explicit, fallible end of stream.
pub trait FinishWrite: Write {
    /// Write out everything still buffered, including any format trailer.
    ///
    /// # Errors
    /// The first I/O error hit while draining, which means the output is truncated.
    fn finish(self: Box<Self>) -> io::Result<()>;
}

impl<W: Write> FinishWrite for BufWriter<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        let mut inner = (*self).into_inner().map_err(io::IntoInnerError::into_error)?;
        inner.flush()
    }
}

/// A compression format compiled into this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codec {
    #[cfg(feature = "compression-gzip")]
    Gzip,
    #[cfg(feature = "compression-zstd")]
    Zstd,
    #[cfg(feature = "compression-bzip2")]
    Bzip2,
    #[cfg(feature = "compression-xz")]
    Xz,
}

impl Codec {
    /// Every codec enabled by cargo features.
    pub const ALL: &'static [Codec] = &[
        #[cfg(feature = "compression-gzip")]
        Codec::Gzip,
        #[cfg(feature = "compression-zstd")]
        Codec::Zstd,
        #[cfg(feature = "compression-bzip2")]
        Codec::Bzip2,
        #[cfg(feature = "compression-xz")]
        Codec::Xz,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => "gzip",
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => "zstd",
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => "bzip2",
            #[cfg(feature = "compression-xz")]
            Codec::Xz => "xz",
        }
    }

    /// Lowercase suffixes, leading dot included.
    #[must_use]
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => &[".gz", ".gzip"],
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => &[".zst", ".zstd"],
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => &[".bz2", ".bzip2"],
            #[cfg(feature = "compression-xz")]
            Codec::Xz => &[".xz"],
        }
    }

    /// Leading bytes of a stream in this format.
    #[must_use]
    pub fn magic(self) -> &'static [u8] {
        match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => &[0x1f, 0x8b],
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => &[0x28, 0xb5, 0x2f, 0xfd],
            // "BZh": "BZ" alone is a plausible start of a CSV header
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => b"BZh",
            #[cfg(feature = "compression-xz")]
            Codec::Xz => &[0xfd, b'7', b'z', b'X', b'Z', 0x00],
        }
    }

    /// Codec named by the suffix of `path`, compared case-insensitively.
    #[must_use]
    pub fn from_path(path: impl AsRef<Path>) -> Option<Codec> {
        let name = path.as_ref().to_string_lossy().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|codec| codec.extensions().iter().any(|ext| name.ends_with(ext)))
    }

    /// Codec whose magic bytes start `head`.
    #[must_use]
    pub fn sniff(head: &[u8]) -> Option<Codec> {
        Self::ALL
            .iter()
            .copied()
            .find(|codec| head.starts_with(codec.magic()))
    }

    /// Decompressing view of `reader`. Concatenated members are read through.
    fn decoder(self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        let decoder: Box<dyn Read> = match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => Box::new(zstd::stream::read::Decoder::new(reader)?),
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            #[cfg(feature = "compression-xz")]
            Codec::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        };
        Ok(decoder)
    }

    /// Compressing sink over `sink`; finishing it finishes `sink` too.
    fn encoder(self, sink: Box<dyn FinishWrite>) -> io::Result<Box<dyn FinishWrite>> {
        let encoder: Box<dyn FinishWrite> = match self {
            #[cfg(feature = "compression-gzip")]
            Codec::Gzip => Box::new(flate2::write::GzEncoder::new(
                sink,
                flate2::Compression::default(),
            )),
            #[cfg(feature = "compression-zstd")]
            Codec::Zstd => Box::new(zstd::stream::write::Encoder::new(
                sink,
                zstd::DEFAULT_COMPRESSION_LEVEL,
            )?),
            #[cfg(feature = "compression-bzip2")]
            Codec::Bzip2 => Box::new(bzip2::write::BzEncoder::new(
                sink,
                bzip2::Compression::default(),
            )),
            #[cfg(feature = "compression-xz")]
            Codec::Xz => Box::new(xz2::write::XzEncoder::new(sink, XZ_PRESET)),
        };
        Ok(encoder)
    }
}

#[cfg(feature = "compression-xz")]
const XZ_PRESET: u32 = 6;

#[cfg(feature = "compression-gzip")]
impl FinishWrite for flate2::write::GzEncoder<Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        flate2::write::GzEncoder::finish(*self)?.finish()
    }
}

#[cfg(feature = "compression-zstd")]
impl FinishWrite for zstd::stream::write::Encoder<'static, Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        zstd::stream::write::Encoder::finish(*self)?.finish()
    }
}

#[cfg(feature = "compression-bzip2")]
impl FinishWrite for bzip2::write::BzEncoder<Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        bzip2::write::BzEncoder::finish(*self)?.finish()
    }
}

#[cfg(feature = "compression-xz")]
impl FinishWrite for xz2::write::XzEncoder<Box<dyn FinishWrite>> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        xz2::write::XzEncoder::finish(*self)?.finish()
    }
}

/// Wrap `reader` with decompression chosen by extension, then by magic bytes.
///
/// # Errors
/// Returns an error if the codec fails to initialise on the stream.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read>> {
    let path_hint = path_hint.as_ref();
    let mut reader = BufReader::new(reader);
    let codec = match Codec::from_path(path_hint) {
        Some(codec) => Some(codec),
        None => Codec::sniff(reader.fill_buf().context("peek at input")?),
    };
    let Some(codec) = codec else {
        return Ok(Box::new(reader));
    };
    debug!("reading {} as {}", path_hint.display(), codec.name());
    codec
        .decoder(Box::new(reader))
        .with_context(|| format!("open {} stream", codec.name()))
}

/// Wrap `writer` in a buffered sink, compressed when the extension of `path_hint`
/// names a codec. Call [`FinishWrite::finish`] once everything is written.
///
/// # Errors
/// Returns an error if the codec fails to initialise on the stream.
pub fn auto_detect_writer<W: Write + 'static>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn FinishWrite>> {
    let path_hint = path_hint.as_ref();
    let sink: Box<dyn FinishWrite> = Box::new(BufWriter::new(writer));
    let Some(codec) = Codec::from_path(path_hint) else {
        return Ok(sink);
    };
    debug!("writing {} as {}", path_hint.display(), codec.name());
    codec
        .encoder(sink)
        .with_context(|| format!("open {} stream", codec.name()))
}
