//! Generic N-dimensional chunked array on disk.
//!
//! One raw little-endian file per chunk; edge chunks are stored full-size,
//! padded with the fill value. Chunk files that do not exist yet read as
//! fill, which is what keeps sparse label arrays cheap.

use std::fs;
use std::marker::PhantomData;
use std::ops::Range;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, ArrayViewD, IxDyn, SliceInfoElem};
use tracing::debug;

use tomopaint_core::constants::{FLOAT_DTYPE, LABEL_DTYPE};
use tomopaint_core::errors::StoreError;

use crate::meta::ZarrArrayMeta;

/// Array element readable from / writable to the raw chunk encoding.
pub trait Element: Copy + Default + Send + Sync + 'static {
    const DTYPE: &'static str;
    const SIZE: usize;

    fn read_le(bytes: &[u8]) -> Self;
    fn write_le(self, out: &mut Vec<u8>);
    fn from_f64(v: f64) -> Self;
}

impl Element for i32 {
    const DTYPE: &'static str = LABEL_DTYPE;
    const SIZE: usize = 4;

    fn read_le(bytes: &[u8]) -> Self {
        i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn from_f64(v: f64) -> Self {
        v as i32
    }
}

impl Element for f32 {
    const DTYPE: &'static str = FLOAT_DTYPE;
    const SIZE: usize = 4;

    fn read_le(bytes: &[u8]) -> Self {
        f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn write_le(self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.to_le_bytes());
    }

    fn from_f64(v: f64) -> Self {
        v as f32
    }
}

/// An open chunked array. Reads and writes are whole-region operations;
/// callers needing write exclusion wrap this in [`crate::LabelStore`].
pub struct ChunkedArray<T: Element> {
    dir: PathBuf,
    meta: ZarrArrayMeta,
    fill: T,
    _marker: PhantomData<T>,
}

impl<T: Element> ChunkedArray<T> {
    /// Open an existing array, verifying dtype and layout.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let meta = ZarrArrayMeta::load(&dir)?;
        if meta.dtype != T::DTYPE {
            return Err(StoreError::DtypeUnsupported {
                dtype: meta.dtype.clone(),
                supported: T::DTYPE,
            });
        }
        let fill = T::from_f64(meta.fill_f64());
        Ok(Self { dir, meta, fill, _marker: PhantomData })
    }

    /// Open an array, creating it (empty, all fill) if its metadata does
    /// not exist yet.
    pub fn open_or_create(
        dir: impl Into<PathBuf>,
        shape: &[usize],
        chunks: &[usize],
    ) -> Result<Self, StoreError> {
        let dir = dir.into();
        if dir.join(crate::meta::ZARRAY_FILE).is_file() {
            let existing = Self::open(dir)?;
            if existing.shape() != shape {
                return Err(StoreError::ShapeMismatch {
                    expected: format!("{shape:?}"),
                    actual: format!("{:?}", existing.shape()),
                });
            }
            return Ok(existing);
        }
        fs::create_dir_all(&dir).map_err(|e| StoreError::ChunkIo {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;
        let meta = ZarrArrayMeta::create(shape.to_vec(), chunks.to_vec(), T::DTYPE);
        meta.save(&dir)?;
        debug!(path = %dir.display(), shape = ?shape, chunks = ?chunks, "created array");
        Ok(Self { dir, meta, fill: T::default(), _marker: PhantomData })
    }

    pub fn shape(&self) -> &[usize] {
        &self.meta.shape
    }

    pub fn chunk_shape(&self) -> &[usize] {
        &self.meta.chunks
    }

    pub fn ndim(&self) -> usize {
        self.meta.shape.len()
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn check_region(&self, region: &[Range<usize>]) -> Result<(), StoreError> {
        if region.len() != self.ndim()
            || region.iter().zip(self.shape()).any(|(r, &len)| r.end > len)
        {
            return Err(StoreError::ShapeMismatch {
                expected: format!("{:?}", self.shape()),
                actual: format!("{region:?}"),
            });
        }
        Ok(())
    }

    /// Read a rectangular region, shaped like the region extent. Missing
    /// chunks read as fill.
    pub fn read_region(&self, region: &[Range<usize>]) -> Result<ArrayD<T>, StoreError> {
        self.check_region(region)?;
        let out_shape: Vec<usize> = region.iter().map(|r| r.len()).collect();
        let mut out = ArrayD::from_elem(IxDyn(&out_shape), self.fill);
        for idx in chunk_indices(region, &self.meta.chunks) {
            let Some(chunk) = self.read_chunk(&idx)? else { continue };
            let (out_sl, ch_sl) = self.overlap_slices(region, &idx);
            out.slice_mut(&out_sl[..]).assign(&chunk.slice(&ch_sl[..]));
        }
        Ok(out)
    }

    /// Write `data` with its origin at `origin`, read-modify-writing each
    /// intersecting chunk.
    pub fn write_region(
        &self,
        origin: &[usize],
        data: ArrayViewD<'_, T>,
    ) -> Result<(), StoreError> {
        let region: Vec<Range<usize>> = origin
            .iter()
            .zip(data.shape())
            .map(|(&o, &len)| o..o + len)
            .collect();
        self.check_region(&region)?;
        for idx in chunk_indices(&region, &self.meta.chunks) {
            let mut chunk = match self.read_chunk(&idx)? {
                Some(c) => c,
                None => ArrayD::from_elem(IxDyn(&self.meta.chunks), self.fill),
            };
            let (data_sl, ch_sl) = self.overlap_slices(&region, &idx);
            chunk
                .slice_mut(&ch_sl[..])
                .assign(&data.slice(&data_sl[..]));
            self.write_chunk(&idx, &chunk)?;
        }
        Ok(())
    }

    /// Slices of (region-relative, chunk-relative) overlap for one chunk.
    fn overlap_slices(
        &self,
        region: &[Range<usize>],
        idx: &[usize],
    ) -> (Vec<SliceInfoElem>, Vec<SliceInfoElem>) {
        let nd = self.ndim();
        let mut region_sl = Vec::with_capacity(nd);
        let mut chunk_sl = Vec::with_capacity(nd);
        for d in 0..nd {
            let chunk_len = self.meta.chunks[d];
            let origin = idx[d] * chunk_len;
            let lo = region[d].start.max(origin);
            let hi = region[d].end.min(origin + chunk_len).min(self.meta.shape[d]);
            region_sl.push(slice_elem(lo - region[d].start, hi - region[d].start));
            chunk_sl.push(slice_elem(lo - origin, hi - origin));
        }
        (region_sl, chunk_sl)
    }

    fn chunk_path(&self, idx: &[usize]) -> PathBuf {
        let sep = self.meta.separator();
        let name: String = idx
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join(&sep.to_string());
        self.dir.join(name)
    }

    fn read_chunk(&self, idx: &[usize]) -> Result<Option<ArrayD<T>>, StoreError> {
        let path = self.chunk_path(idx);
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StoreError::ChunkIo {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })
            }
        };
        let expected = self.meta.chunks.iter().product::<usize>() * T::SIZE;
        if bytes.len() != expected {
            return Err(StoreError::ChunkIo {
                path: path.display().to_string(),
                message: format!("chunk is {} bytes, expected {expected}", bytes.len()),
            });
        }
        let values: Vec<T> = bytes.chunks_exact(T::SIZE).map(T::read_le).collect();
        let chunk = ArrayD::from_shape_vec(IxDyn(&self.meta.chunks), values).map_err(|e| {
            StoreError::ChunkIo {
                path: path.display().to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Some(chunk))
    }

    fn write_chunk(&self, idx: &[usize], chunk: &ArrayD<T>) -> Result<(), StoreError> {
        let path = self.chunk_path(idx);
        let mut bytes = Vec::with_capacity(chunk.len() * T::SIZE);
        // Logical iteration order is row-major, matching order "C".
        for &v in chunk.iter() {
            v.write_le(&mut bytes);
        }
        fs::write(&path, bytes).map_err(|e| StoreError::ChunkIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

fn slice_elem(start: usize, end: usize) -> SliceInfoElem {
    SliceInfoElem::Slice {
        start: start as isize,
        end: Some(end as isize),
        step: 1,
    }
}

/// Indices of every chunk intersecting `region` (cartesian product of the
/// per-axis chunk ranges).
fn chunk_indices(region: &[Range<usize>], chunks: &[usize]) -> Vec<Vec<usize>> {
    let per_dim: Vec<Vec<usize>> = region
        .iter()
        .zip(chunks)
        .map(|(r, &c)| {
            if r.is_empty() {
                Vec::new()
            } else {
                (r.start / c..=(r.end - 1) / c).collect()
            }
        })
        .collect();
    if per_dim.iter().any(Vec::is_empty) {
        return Vec::new();
    }
    let mut out: Vec<Vec<usize>> = vec![Vec::new()];
    for dim in &per_dim {
        let mut next = Vec::with_capacity(out.len() * dim.len());
        for prefix in &out {
            for &i in dim {
                let mut v = prefix.clone();
                v.push(i);
                next.push(v);
            }
        }
        out = next;
    }
    out
}
