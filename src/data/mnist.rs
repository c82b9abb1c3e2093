//! Decoder for the MNIST IDX file pair (labels + images).
//!
//! # IDX3 image file layout
//! ```text
//! bytes  0-3:   0x00000803  (magic, big-endian)
//! bytes  4-7:   N           (number of images, big-endian u32)
//! bytes  8-11:  rows        (image height in pixels, big-endian u32)
//! bytes 12-15:  cols        (image width in pixels, big-endian u32)
//! bytes 16..:   N * rows * cols bytes, row-major, uint8
//! ```
//!
//! # IDX1 label file layout
//! ```text
//! bytes  0-3:   0x00000801  (magic, big-endian)
//! bytes  4-7:   N           (number of labels, big-endian u32)
//! bytes  8..:   N bytes, each a class index
//! ```
//!
//! The usable sample count is the smallest of the declared label count, the
//! declared image count, and what each buffer actually holds, so truncated
//! files load as far as they go.

use crate::data::Samples;
use crate::math::matrix::Matrix;

pub const LABEL_MAGIC: u32 = 0x0000_0801;
pub const IMAGE_MAGIC: u32 = 0x0000_0803;

/// Number of digit classes; also the width of a one-hot label row.
pub const N_CLASSES: usize = 10;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    count: usize,
    rows: usize,
    cols: usize,
    labels: Vec<u8>,
    /// `count * rows * cols` pixel bytes, one image after another.
    images: Vec<u8>,
}

fn read_u32_be(bytes: &[u8], offset: usize) -> u32 {
    u32::from_be_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

impl DataSet {
    /// Reads and decodes an IDX label file and an IDX image file.
    pub fn load(labels_path: &str, images_path: &str) -> Result<DataSet, String> {
        let label_bytes = std::fs::read(labels_path)
            .map_err(|e| format!("cannot read label file '{}': {}", labels_path, e))?;
        let image_bytes = std::fs::read(images_path)
            .map_err(|e| format!("cannot read image file '{}': {}", images_path, e))?;
        DataSet::from_bytes(&label_bytes, &image_bytes)
    }

    /// Decodes an in-memory IDX label/image pair.
    pub fn from_bytes(label_bytes: &[u8], image_bytes: &[u8]) -> Result<DataSet, String> {
        // ── Label file ──────────────────────────────────────────────────────

        if label_bytes.len() < 8 {
            return Err(format!(
                "IDX label file too short: expected at least 8 header bytes, got {}.",
                label_bytes.len()
            ));
        }
        let magic = read_u32_be(label_bytes, 0);
        if magic != LABEL_MAGIC {
            return Err(format!(
                "IDX label file: magic must be {:#010x}, got {:#010x}.",
                LABEL_MAGIC, magic
            ));
        }
        let labels_count = (read_u32_be(label_bytes, 4) as usize).min(label_bytes.len() - 8);

        // ── Image file ──────────────────────────────────────────────────────

        if image_bytes.len() < 16 {
            return Err(format!(
                "IDX image file too short: expected at least 16 header bytes, got {}.",
                image_bytes.len()
            ));
        }
        let magic = read_u32_be(image_bytes, 0);
        if magic != IMAGE_MAGIC {
            return Err(format!(
                "IDX image file: magic must be {:#010x}, got {:#010x}.",
                IMAGE_MAGIC, magic
            ));
        }
        let declared = read_u32_be(image_bytes, 4) as usize;
        let rows = read_u32_be(image_bytes, 8) as usize;
        let cols = read_u32_be(image_bytes, 12) as usize;

        let n_pixels = rows.checked_mul(cols).ok_or_else(|| {
            format!("IDX image file: rows * cols overflows usize (rows={}, cols={}).", rows, cols)
        })?;
        if n_pixels == 0 {
            return Err(format!(
                "IDX image file: image dimensions must be positive, got {}x{}.",
                rows, cols
            ));
        }

        let count = declared
            .min((image_bytes.len() - 16) / n_pixels)
            .min(labels_count);

        Ok(DataSet {
            count,
            rows,
            cols,
            labels: label_bytes[8..8 + count].to_vec(),
            images: image_bytes[16..16 + count * n_pixels].to_vec(),
        })
    }

    /// `(rows, cols)` of each image.
    pub fn image_dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn label(&self, index: usize) -> Option<u8> {
        self.labels.get(index).copied()
    }
}

impl Samples for DataSet {
    fn size(&self) -> usize {
        self.count
    }

    /// Image `index` as a `1 x (rows*cols)` row with pixels scaled to [0, 1].
    fn image_to_matrix(&self, index: usize) -> Option<Matrix> {
        if index >= self.count {
            return None;
        }
        let n = self.rows * self.cols;
        let pixels = &self.images[index * n..(index + 1) * n];
        let mut out = Matrix::zeros(1, n);
        for (dst, &px) in out.as_mut_slice().iter_mut().zip(pixels) {
            *dst = px as f64 / 255.0;
        }
        Some(out)
    }

    /// Label `index` as a `1 x 10` one-hot row.
    ///
    /// Out-of-range indices and labels outside `0..10` give an all-zero row.
    fn label_to_matrix(&self, index: usize) -> Matrix {
        let mut out = Matrix::zeros(1, N_CLASSES);
        if let Some(v) = self.label(index) {
            if (v as usize) < N_CLASSES {
                out.as_mut_slice()[v as usize] = 1.0;
            }
        }
        out
    }
}
