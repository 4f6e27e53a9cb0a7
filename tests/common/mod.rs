//! Scripted in-memory codec sessions for exercising the streaming protocol.
#![allow(dead_code)]

use zenrows::{
    Capabilities, Capability, ColorModel, Decoder, Encoder, ImageInfo, Interlace, RowError,
    Transform,
};

/// Fill value for row `pos` of pass `pass`.
pub fn pattern(pass: usize, pos: u32) -> u8 {
    (pass as u8) << 5 | (pos as u8 & 0x1F)
}

fn pass_count(info: &ImageInfo) -> usize {
    match info.interlace {
        Interlace::Adam7 => 7,
        _ => 1,
    }
}

/// Decoder that reports a fixed header, records every call, and fills each
/// row with [`pattern`].
pub struct ScriptedDecoder {
    pub caps: Capabilities,
    header: ImageInfo,
    info: ImageInfo,
    pub installed: Vec<Transform>,
    pub header_read: bool,
    pub interlace_enabled: bool,
    pub info_updated: bool,
    pub output_override: Option<(ColorModel, u8)>,
    pub rows_read: usize,
    pub fail_at_row: Option<usize>,
    pub end_read: bool,
}

impl ScriptedDecoder {
    pub fn new(header: ImageInfo) -> Self {
        Self {
            caps: Capabilities::all(),
            header,
            info: ImageInfo::default(),
            installed: Vec::new(),
            header_read: false,
            interlace_enabled: false,
            info_updated: false,
            output_override: None,
            rows_read: 0,
            fail_at_row: None,
            end_read: false,
        }
    }

    pub fn source(model: ColorModel, depth: u8, width: u32, height: u32) -> Self {
        Self::new(ImageInfo {
            width,
            height,
            color_model: model,
            bit_depth: depth,
            ..ImageInfo::default()
        })
    }

    pub fn without(mut self, cap: Capability) -> Self {
        self.caps = self.caps.without(cap);
        self
    }

    pub fn interlaced(mut self) -> Self {
        self.header.interlace = Interlace::Adam7;
        self
    }

    pub fn header_mut(&mut self) -> &mut ImageInfo {
        &mut self.header
    }

    /// Capabilities of the installed transforms, in install order.
    pub fn installed_caps(&self) -> Vec<Capability> {
        self.installed.iter().map(Transform::capability).collect()
    }

    pub fn has_installed(&self, cap: Capability) -> bool {
        self.installed_caps().contains(&cap)
    }
}

impl Decoder for ScriptedDecoder {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn read_header(&mut self) -> Result<(), RowError> {
        self.info = self.header.clone();
        self.header_read = true;
        Ok(())
    }

    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn info_mut(&mut self) -> &mut ImageInfo {
        &mut self.info
    }

    fn install(&mut self, transform: Transform) {
        assert!(
            self.caps.supports(transform.capability()),
            "installed {transform:?} without capability"
        );
        self.installed.push(transform);
    }

    fn set_interlace_handling(&mut self) -> usize {
        self.interlace_enabled = true;
        pass_count(&self.info)
    }

    fn update_info(&mut self) -> Result<(), RowError> {
        if let Some((model, depth)) = self.output_override {
            self.info.color_model = model;
            self.info.bit_depth = depth;
        }
        self.info_updated = true;
        Ok(())
    }

    fn read_row(&mut self, row: &mut [u8]) -> Result<(), RowError> {
        if self.fail_at_row == Some(self.rows_read) {
            return Err(RowError::io("unexpected end of stream"));
        }
        let height = self.info.height.max(1) as usize;
        let pass = self.rows_read / height;
        let pos = (self.rows_read % height) as u32;
        row.fill(pattern(pass, pos));
        self.rows_read += 1;
        Ok(())
    }

    fn read_end(&mut self) -> Result<(), RowError> {
        self.end_read = true;
        Ok(())
    }
}

/// Encoder that keeps every written row.
pub struct RecordingEncoder {
    pub caps: Capabilities,
    info: ImageInfo,
    pub installed: Vec<Transform>,
    pub header_written: bool,
    pub rows: Vec<Vec<u8>>,
    pub fail_at_row: Option<usize>,
    pub ended: bool,
}

impl RecordingEncoder {
    pub fn new() -> Self {
        Self {
            caps: Capabilities::all(),
            info: ImageInfo::default(),
            installed: Vec::new(),
            header_written: false,
            rows: Vec::new(),
            fail_at_row: None,
            ended: false,
        }
    }

    pub fn without(mut self, cap: Capability) -> Self {
        self.caps = self.caps.without(cap);
        self
    }
}

impl Encoder for RecordingEncoder {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn set_info(&mut self, info: ImageInfo) {
        self.info = info;
    }

    fn info(&self) -> &ImageInfo {
        &self.info
    }

    fn write_header(&mut self) -> Result<(), RowError> {
        self.header_written = true;
        Ok(())
    }

    fn install(&mut self, transform: Transform) {
        self.installed.push(transform);
    }

    fn set_interlace_handling(&mut self) -> usize {
        pass_count(&self.info)
    }

    fn write_row(&mut self, row: &[u8]) -> Result<(), RowError> {
        if self.fail_at_row == Some(self.rows.len()) {
            return Err(RowError::io("disk full"));
        }
        self.rows.push(row.to_vec());
        Ok(())
    }

    fn write_end(&mut self) -> Result<(), RowError> {
        self.ended = true;
        Ok(())
    }
}
