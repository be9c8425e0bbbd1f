//! Command buffer encoding
//!
//! Little-endian. `u32 count`, then per command: `u8 op`, `i32 node`,
//! `u8 mask`, then the fields the mask names in bit order:
//!
//! | bit | field   | encoding                                   |
//! |-----|---------|--------------------------------------------|
//! | 0   | tag     | `u8`                                       |
//! | 1   | parent  | `i32`, `-1` for none                       |
//! | 2   | sibling | `i32`                                      |
//! | 3   | layout  | `f32` x, y, width, height                  |
//! | 4   | styles  | `u16` length + UTF-8 `key=value` NUL-joined |
//! | 5   | text    | `u16` length + UTF-8                       |

use tessel_dom::{NodeId, Tag};
use tessel_layout::Rect;

use crate::{Command, FieldMask, Op};

/// Smallest possible command: op, node, mask
const MIN_COMMAND_LEN: usize = 6;

/// Why a buffer could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("buffer truncated: needed {needed} bytes at offset {offset}")]
    Truncated { needed: usize, offset: usize },
    #[error("unknown opcode {0}")]
    UnknownOp(u8),
    #[error("string field is not valid UTF-8")]
    InvalidUtf8,
}

/// Encode commands into one buffer
pub fn encode(commands: &[Command]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + commands.len() * 24);
    write_u32(&mut buf, commands.len() as u32);
    for command in commands {
        encode_command(&mut buf, command);
    }
    buf
}

fn encode_command(buf: &mut Vec<u8>, command: &Command) {
    buf.push(command.op as u8);
    write_i32(buf, command.node.0 as i32);
    buf.push(command.mask().bits());

    if let Some(tag) = command.tag {
        buf.push(tag.as_u8());
    }
    if let Some(parent) = command.parent {
        write_i32(buf, parent.map_or(-1, |p| p.0 as i32));
    }
    if let Some(index) = command.sibling_index {
        write_i32(buf, index);
    }
    if let Some(rect) = command.layout {
        for v in [rect.x, rect.y, rect.width, rect.height] {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }
    if let Some(styles) = &command.styles {
        write_string(buf, &style_blob(command.node, styles));
    }
    if let Some(text) = &command.text {
        write_string(buf, clip(command.node, text, u16::MAX as usize));
    }
}

/// `key=value` pairs sorted by key, NUL-joined. Pairs that would overflow
/// the `u16` length prefix are dropped.
fn style_blob(node: NodeId, styles: &[(String, String)]) -> String {
    let mut sorted: Vec<&(String, String)> = styles.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut blob = String::new();
    for (key, value) in sorted {
        let extra = key.len() + value.len() + 1 + usize::from(!blob.is_empty());
        if blob.len() + extra > u16::MAX as usize {
            tracing::warn!(%node, "style blob too large, dropping remaining properties");
            break;
        }
        if !blob.is_empty() {
            blob.push('\0');
        }
        blob.push_str(key);
        blob.push('=');
        blob.push_str(value);
    }
    blob
}

fn clip<'a>(node: NodeId, text: &'a str, max: usize) -> &'a str {
    if text.len() <= max {
        return text;
    }
    tracing::warn!(%node, len = text.len(), "text too large, truncating");
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Decode a buffer, logging and returning nothing if it is malformed
pub fn decode(buf: &[u8]) -> Vec<Command> {
    match try_decode(buf) {
        Ok(commands) => commands,
        Err(e) => {
            tracing::warn!(error = %e, len = buf.len(), "failed to decode command buffer");
            Vec::new()
        }
    }
}

/// Decode a buffer. Buffers shorter than the count header hold no
/// commands.
pub fn try_decode(buf: &[u8]) -> Result<Vec<Command>, DecodeError> {
    if buf.len() < 4 {
        return Ok(Vec::new());
    }
    let mut reader = Reader { buf, pos: 0 };
    let count = reader.u32()? as usize;
    let mut commands = Vec::with_capacity(count.min(buf.len() / MIN_COMMAND_LEN));
    for _ in 0..count {
        commands.push(reader.command()?);
    }
    Ok(commands)
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.buf.len())
            .ok_or(DecodeError::Truncated {
                needed: len,
                offset: self.pos,
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, DecodeError> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        self.array().map(u32::from_le_bytes)
    }

    fn i32(&mut self) -> Result<i32, DecodeError> {
        self.array().map(i32::from_le_bytes)
    }

    fn f32(&mut self) -> Result<f32, DecodeError> {
        self.array().map(f32::from_le_bytes)
    }

    fn string(&mut self) -> Result<&'a str, DecodeError> {
        let len = self.u16()? as usize;
        std::str::from_utf8(self.take(len)?).map_err(|_| DecodeError::InvalidUtf8)
    }

    fn command(&mut self) -> Result<Command, DecodeError> {
        let raw_op = self.u8()?;
        let op = Op::from_u8(raw_op).ok_or(DecodeError::UnknownOp(raw_op))?;
        let node = NodeId(self.i32()? as u32);
        let mask = FieldMask::from_bits_truncate(self.u8()?);

        let mut command = Command {
            op,
            node,
            tag: None,
            parent: None,
            sibling_index: None,
            layout: None,
            styles: None,
            text: None,
        };
        if mask.contains(FieldMask::TAG) {
            command.tag = Some(Tag::from_u8(self.u8()?).unwrap_or(Tag::Unknown));
        }
        if mask.contains(FieldMask::PARENT) {
            let parent = self.i32()?;
            command.parent = Some((parent >= 0).then_some(NodeId(parent as u32)));
        }
        if mask.contains(FieldMask::SIBLING) {
            command.sibling_index = Some(self.i32()?);
        }
        if mask.contains(FieldMask::LAYOUT) {
            command.layout = Some(Rect::new(self.f32()?, self.f32()?, self.f32()?, self.f32()?));
        }
        if mask.contains(FieldMask::STYLES) {
            command.styles = Some(parse_style_blob(self.string()?));
        }
        if mask.contains(FieldMask::TEXT) {
            command.text = Some(self.string()?.to_string());
        }
        Ok(command)
    }
}

fn parse_style_blob(blob: &str) -> Vec<(String, String)> {
    blob.split('\0')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (k.to_string(), v.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

fn write_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

fn write_string(buf: &mut Vec<u8>, value: &str) {
    buf.extend_from_slice(&(value.len() as u16).to_le_bytes());
    buf.extend_from_slice(value.as_bytes());
}
