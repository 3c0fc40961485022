use std::collections::{BTreeMap, HashMap, HashSet};

use glam::{Mat4, Vec2, Vec3, Vec4};

use super::UniformError;

/// Uniform value types a program accepts from the host.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformKind {
    Int,
    Uint,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat4,
}

impl UniformKind {
    /// Bytes written into the uniform block.
    pub const fn size(self) -> usize {
        match self {
            UniformKind::Int | UniformKind::Uint | UniformKind::Float => 4,
            UniformKind::Vec2 => 8,
            UniformKind::Vec3 => 12,
            UniformKind::Vec4 => 16,
            UniformKind::Mat4 => 64,
        }
    }

    /// Maps a naga type; `None` for types the host cannot set directly.
    pub(crate) fn from_naga(inner: &naga::TypeInner) -> Option<Self> {
        use naga::{ScalarKind, TypeInner, VectorSize};

        match *inner {
            TypeInner::Scalar(scalar) if scalar.width == 4 => match scalar.kind {
                ScalarKind::Sint => Some(UniformKind::Int),
                ScalarKind::Uint => Some(UniformKind::Uint),
                ScalarKind::Float => Some(UniformKind::Float),
                _ => None,
            },
            TypeInner::Vector { size, scalar }
                if scalar.kind == ScalarKind::Float && scalar.width == 4 =>
            {
                Some(match size {
                    VectorSize::Bi => UniformKind::Vec2,
                    VectorSize::Tri => UniformKind::Vec3,
                    VectorSize::Quad => UniformKind::Vec4,
                })
            }
            TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar,
            } if scalar.kind == ScalarKind::Float && scalar.width == 4 => Some(UniformKind::Mat4),
            _ => None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Uint(u32),
    Float(f32),
    Vec2(Vec2),
    Vec3(Vec3),
    Vec4(Vec4),
    Mat4(Mat4),
}

impl UniformValue {
    pub fn kind(&self) -> UniformKind {
        match self {
            UniformValue::Int(_) => UniformKind::Int,
            UniformValue::Uint(_) => UniformKind::Uint,
            UniformValue::Float(_) => UniformKind::Float,
            UniformValue::Vec2(_) => UniformKind::Vec2,
            UniformValue::Vec3(_) => UniformKind::Vec3,
            UniformValue::Vec4(_) => UniformKind::Vec4,
            UniformValue::Mat4(_) => UniformKind::Mat4,
        }
    }

    /// Writes the value's std layout bytes; `out` is exactly `kind().size()` long.
    fn write(&self, out: &mut [u8]) {
        match self {
            UniformValue::Int(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Uint(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Float(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec2(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec3(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            UniformValue::Vec4(v) => out.copy_from_slice(bytemuck::bytes_of(v)),
            // column-major, as WGSL expects
            UniformValue::Mat4(m) => out.copy_from_slice(bytemuck::bytes_of(&m.to_cols_array())),
        }
    }
}

/// Where a named uniform lives: its block and byte offset inside it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UniformSlot {
    pub group: u32,
    pub binding: u32,
    pub offset: u32,
    pub kind: UniformKind,
}

impl UniformSlot {
    #[inline]
    pub fn block(&self) -> (u32, u32) {
        (self.group, self.binding)
    }
}

#[derive(Debug)]
struct Block {
    bytes: Vec<u8>,
    dirty: bool,
}

/// Host-side staging for a program's uniform blocks.
///
/// Built once at link time from reflection. Setting a value only touches the
/// staged bytes and marks its block dirty; [`drain_dirty`](Self::drain_dirty)
/// hands dirty blocks to the uploader.
#[derive(Debug, Default)]
pub struct UniformTable {
    slots: HashMap<String, UniformSlot>,
    blocks: BTreeMap<(u32, u32), Block>,
    warned: HashSet<String>,
}

impl UniformTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a block of `size` bytes; zero-filled, not dirty.
    pub fn add_block(&mut self, group: u32, binding: u32, size: usize) {
        self.blocks.insert(
            (group, binding),
            Block {
                bytes: vec![0; size],
                dirty: false,
            },
        );
    }

    /// Registers a named member. Its block must have been added already and be
    /// large enough.
    pub fn add_slot(&mut self, name: impl Into<String>, slot: UniformSlot) {
        let name = name.into();
        debug_assert!(
            self.blocks
                .get(&slot.block())
                .is_some_and(|b| b.bytes.len() >= slot.offset as usize + slot.kind.size()),
            "uniform '{name}' does not fit its block"
        );
        self.slots.insert(name, slot);
    }

    pub fn slot(&self, name: &str) -> Option<UniformSlot> {
        self.slots.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn blocks(&self) -> impl Iterator<Item = ((u32, u32), usize)> + '_ {
        self.blocks.iter().map(|(&key, b)| (key, b.bytes.len()))
    }

    pub fn block_bytes(&self, group: u32, binding: u32) -> Option<&[u8]> {
        self.blocks.get(&(group, binding)).map(|b| b.bytes.as_slice())
    }

    /// Stages `value` under `name`.
    ///
    /// Unknown names are reported once per name at warn level, then only
    /// returned as errors.
    pub fn set(&mut self, name: &str, value: UniformValue) -> Result<(), UniformError> {
        let Some(slot) = self.slots.get(name).copied() else {
            if self.warned.insert(name.to_owned()) {
                log::warn!("uniform '{name}' not found in program");
            }
            return Err(UniformError::Unknown(name.to_owned()));
        };

        if slot.kind != value.kind() {
            return Err(UniformError::KindMismatch {
                name: name.to_owned(),
                expected: slot.kind,
                found: value.kind(),
            });
        }

        let Some(block) = self.blocks.get_mut(&slot.block()) else {
            return Err(UniformError::Unknown(name.to_owned()));
        };
        let start = slot.offset as usize;
        value.write(&mut block.bytes[start..start + slot.kind.size()]);
        block.dirty = true;
        Ok(())
    }

    pub fn is_dirty(&self) -> bool {
        self.blocks.values().any(|b| b.dirty)
    }

    /// Calls `upload` for every dirty block and clears its flag.
    pub fn drain_dirty(&mut self, mut upload: impl FnMut((u32, u32), &[u8])) {
        for (&key, block) in self.blocks.iter_mut().filter(|(_, b)| b.dirty) {
            upload(key, &block.bytes);
            block.dirty = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> UniformTable {
        let mut t = UniformTable::new();
        t.add_block(2, 0, 16);
        t.add_slot(
            "num_indices",
            UniformSlot {
                group: 2,
                binding: 0,
                offset: 0,
                kind: UniformKind::Uint,
            },
        );
        t.add_slot(
            "t",
            UniformSlot {
                group: 2,
                binding: 0,
                offset: 4,
                kind: UniformKind::Float,
            },
        );
        t
    }

    // ── staging ───────────────────────────────────────────────────────────

    #[test]
    fn set_writes_at_offset() {
        let mut t = table();
        t.set("t", UniformValue::Float(1.5)).unwrap();
        t.set("num_indices", UniformValue::Uint(3)).unwrap();

        let bytes = t.block_bytes(2, 0).unwrap();
        assert_eq!(&bytes[0..4], &3u32.to_ne_bytes());
        assert_eq!(&bytes[4..8], &1.5f32.to_ne_bytes());
        assert_eq!(&bytes[8..], &[0; 8]);
    }

    #[test]
    fn last_write_wins() {
        let mut t = table();
        t.set("t", UniformValue::Float(1.0)).unwrap();
        t.set("t", UniformValue::Float(2.0)).unwrap();
        assert_eq!(&t.block_bytes(2, 0).unwrap()[4..8], &2.0f32.to_ne_bytes());
    }

    #[test]
    fn mat4_is_column_major() {
        let mut t = UniformTable::new();
        t.add_block(0, 0, 64);
        t.add_slot(
            "mvp",
            UniformSlot {
                group: 0,
                binding: 0,
                offset: 0,
                kind: UniformKind::Mat4,
            },
        );
        let m = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        t.set("mvp", UniformValue::Mat4(m)).unwrap();

        let floats: &[f32] = bytemuck::cast_slice(t.block_bytes(0, 0).unwrap());
        assert_eq!(&floats[12..15], &[1.0, 2.0, 3.0]);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn unknown_name_fails() {
        let mut t = table();
        let err = t.set("time", UniformValue::Float(1.0)).unwrap_err();
        assert_eq!(err, UniformError::Unknown("time".into()));
        // second lookup still fails, warning is not repeated
        assert!(t.set("time", UniformValue::Float(1.0)).is_err());
        assert_eq!(t.warned.len(), 1);
        assert!(!t.is_dirty());
    }

    #[test]
    fn wrong_kind_fails_without_writing() {
        let mut t = table();
        let err = t.set("t", UniformValue::Int(1)).unwrap_err();
        assert_eq!(
            err,
            UniformError::KindMismatch {
                name: "t".into(),
                expected: UniformKind::Float,
                found: UniformKind::Int,
            }
        );
        assert!(!t.is_dirty());
        assert_eq!(t.block_bytes(2, 0).unwrap(), &[0; 16]);
    }

    // ── upload ────────────────────────────────────────────────────────────

    #[test]
    fn drain_visits_dirty_blocks_once() {
        let mut t = table();
        t.add_block(0, 1, 16);
        t.set("t", UniformValue::Float(4.0)).unwrap();

        let mut seen = Vec::new();
        t.drain_dirty(|key, bytes| seen.push((key, bytes.len())));
        assert_eq!(seen, vec![((2, 0), 16)]);

        seen.clear();
        t.drain_dirty(|key, bytes| seen.push((key, bytes.len())));
        assert!(seen.is_empty());
    }

    #[test]
    fn naga_kinds() {
        use naga::{Scalar, TypeInner, VectorSize};

        assert_eq!(
            UniformKind::from_naga(&TypeInner::Scalar(Scalar::U32)),
            Some(UniformKind::Uint)
        );
        assert_eq!(
            UniformKind::from_naga(&TypeInner::Vector {
                size: VectorSize::Tri,
                scalar: Scalar::F32
            }),
            Some(UniformKind::Vec3)
        );
        assert_eq!(
            UniformKind::from_naga(&TypeInner::Matrix {
                columns: VectorSize::Quad,
                rows: VectorSize::Quad,
                scalar: Scalar::F32
            }),
            Some(UniformKind::Mat4)
        );
        assert_eq!(
            UniformKind::from_naga(&TypeInner::Vector {
                size: VectorSize::Bi,
                scalar: Scalar::I32
            }),
            None
        );
    }
}
