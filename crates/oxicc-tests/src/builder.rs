//! Synthetic ICC profiles
//!
//! Builds profile bytes tag by tag so tests can exercise exact layouts and
//! break them on purpose.

use oxicc_core::Matrix3x3;

/// The ICC D50 illuminant
pub const D50: [f32; 3] = [0.9642, 1.0, 0.8249];

/// s15Fixed16Number
pub fn s15fixed16(v: f32) -> [u8; 4] {
    ((v as f64 * 65536.0).round() as i32).to_be_bytes()
}

/// An `XYZ ` tag body
pub fn xyz_tag(xyz: [f32; 3]) -> Vec<u8> {
    let mut data = b"XYZ \0\0\0\0".to_vec();
    for v in xyz {
        data.extend_from_slice(&s15fixed16(v));
    }
    data
}

/// A `curv` tag with a single u8Fixed8 gamma
pub fn gamma_curv(gamma: f32) -> Vec<u8> {
    let mut data = b"curv\0\0\0\0\0\0\0\x01".to_vec();
    data.extend_from_slice(&((gamma * 256.0).round() as u16).to_be_bytes());
    data
}

/// A `curv` tag holding a 16-bit table
pub fn table_curv(values: &[u16]) -> Vec<u8> {
    let mut data = b"curv\0\0\0\0".to_vec();
    data.extend_from_slice(&(values.len() as u32).to_be_bytes());
    for v in values {
        data.extend_from_slice(&v.to_be_bytes());
    }
    data
}

/// A 16-bit table sampling `f` at `n` evenly spaced points
pub fn sampled_curv(n: usize, f: impl Fn(f32) -> f32) -> Vec<u8> {
    let values: Vec<u16> = (0..n)
        .map(|i| {
            let x = i as f32 / (n - 1) as f32;
            (f(x).clamp(0.0, 1.0) * 65535.0).round() as u16
        })
        .collect();
    table_curv(&values)
}

/// A `para` tag of `function_type` with its parameters
pub fn para(function_type: u16, params: &[f32]) -> Vec<u8> {
    let mut data = b"para\0\0\0\0".to_vec();
    data.extend_from_slice(&function_type.to_be_bytes());
    data.extend_from_slice(&[0, 0]);
    for &p in params {
        data.extend_from_slice(&s15fixed16(p));
    }
    data
}

/// An `mft2` tag with identity curves and a grid sampling `f`
///
/// Input and output tables have `table_size` entries. Grid entries are
/// ordered with the last input channel varying fastest.
pub fn mft2(input_channels: u8, grid_points: u8, table_size: u16, f: impl Fn(&[f32]) -> [f32; 3]) -> Vec<u8> {
    let mut data = b"mft2\0\0\0\0".to_vec();
    data.extend_from_slice(&[input_channels, 3, grid_points, 0]);
    for v in Matrix3x3::identity().vals.iter().flatten() {
        data.extend_from_slice(&s15fixed16(*v));
    }
    data.extend_from_slice(&table_size.to_be_bytes());
    data.extend_from_slice(&table_size.to_be_bytes());

    let ramp = |data: &mut Vec<u8>| {
        for i in 0..table_size as u32 {
            let v = (i * 65535 / (table_size as u32 - 1)) as u16;
            data.extend_from_slice(&v.to_be_bytes());
        }
    };
    for _ in 0..input_channels {
        ramp(&mut data);
    }

    let n = grid_points as usize;
    let cells = n.pow(input_channels as u32);
    let mut coords = vec![0.0f32; input_channels as usize];
    for cell in 0..cells {
        let mut rest = cell;
        for c in coords.iter_mut().rev() {
            *c = (rest % n) as f32 / (n - 1) as f32;
            rest /= n;
        }
        for v in f(&coords) {
            data.extend_from_slice(&((v.clamp(0.0, 1.0) * 65535.0).round() as u16).to_be_bytes());
        }
    }

    for _ in 0..3 {
        ramp(&mut data);
    }
    data
}

/// Builds ICC profile bytes
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    version: u32,
    signature: [u8; 4],
    color_space: [u8; 4],
    pcs: [u8; 4],
    illuminant: [f32; 3],
    tags: Vec<([u8; 4], Vec<u8>)>,
    /// Entries written as-is: signature, offset, size
    raw_entries: Vec<([u8; 4], u32, u32)>,
    declared_size: Option<u32>,
}

impl Default for ProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileBuilder {
    /// An RGB display profile with an XYZ PCS and no tags
    pub fn new() -> Self {
        Self {
            version: 0x0430_0000,
            signature: *b"acsp",
            color_space: *b"RGB ",
            pcs: *b"XYZ ",
            illuminant: D50,
            tags: Vec::new(),
            raw_entries: Vec::new(),
            declared_size: None,
        }
    }

    /// Colorants from `to_xyzd50` and the same TRC on every channel
    pub fn matrix_shaper(to_xyzd50: &Matrix3x3, trc: Vec<u8>) -> Self {
        let column = |c: usize| to_xyzd50.vals.map(|row| row[c]);
        Self::new()
            .tag(b"rXYZ", xyz_tag(column(0)))
            .tag(b"gXYZ", xyz_tag(column(1)))
            .tag(b"bXYZ", xyz_tag(column(2)))
            .tag(b"rTRC", trc.clone())
            .tag(b"gTRC", trc.clone())
            .tag(b"bTRC", trc)
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    pub fn signature(mut self, signature: &[u8; 4]) -> Self {
        self.signature = *signature;
        self
    }

    pub fn color_space(mut self, color_space: &[u8; 4]) -> Self {
        self.color_space = *color_space;
        self
    }

    pub fn illuminant(mut self, illuminant: [f32; 3]) -> Self {
        self.illuminant = illuminant;
        self
    }

    /// Append a tag; its data is laid out after the directory, 4-byte aligned
    pub fn tag(mut self, signature: &[u8; 4], data: Vec<u8>) -> Self {
        self.tags.push((*signature, data));
        self
    }

    /// Replace the data of an existing tag
    pub fn replace_tag(mut self, signature: &[u8; 4], data: Vec<u8>) -> Self {
        if let Some(entry) = self.tags.iter_mut().find(|(sig, _)| sig == signature) {
            entry.1 = data;
        }
        self
    }

    /// Append a directory entry pointing wherever the caller says
    pub fn raw_entry(mut self, signature: &[u8; 4], offset: u32, size: u32) -> Self {
        self.raw_entries.push((*signature, offset, size));
        self
    }

    /// Override the size field in the header
    pub fn declared_size(mut self, size: u32) -> Self {
        self.declared_size = Some(size);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let tag_count = self.tags.len() + self.raw_entries.len();
        let data_start = 132 + tag_count * 12;

        let mut body = Vec::new();
        let mut entries = Vec::with_capacity(tag_count);
        for (sig, data) in &self.tags {
            entries.push((*sig, (data_start + body.len()) as u32, data.len() as u32));
            body.extend_from_slice(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
        }
        entries.extend(self.raw_entries.iter().copied());

        let total = data_start + body.len();
        let mut out = vec![0u8; 128];
        out[0..4].copy_from_slice(&self.declared_size.unwrap_or(total as u32).to_be_bytes());
        out[8..12].copy_from_slice(&self.version.to_be_bytes());
        out[12..16].copy_from_slice(b"mntr");
        out[16..20].copy_from_slice(&self.color_space);
        out[20..24].copy_from_slice(&self.pcs);
        out[36..40].copy_from_slice(&self.signature);
        for (i, v) in self.illuminant.iter().enumerate() {
            out[68 + i * 4..72 + i * 4].copy_from_slice(&s15fixed16(*v));
        }
        out.extend_from_slice(&(tag_count as u32).to_be_bytes());
        for (sig, offset, size) in entries {
            out.extend_from_slice(&sig);
            out.extend_from_slice(&offset.to_be_bytes());
            out.extend_from_slice(&size.to_be_bytes());
        }
        out.extend_from_slice(&body);
        out
    }
}
