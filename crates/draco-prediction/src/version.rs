// Draco bitstream version constants.
//
// The transform layer never reads the container header itself; the version
// is agreed out-of-band and handed to the `DecoderBuffer`. Versions are
// (major, minor) pairs, packed as `(major << 8) | minor` where a single
// integer is needed.

/// Latest major version of the Draco Mesh bitstream.
pub const DRACO_MESH_BITSTREAM_VERSION_MAJOR: u8 = 2;

/// Latest minor version of the Draco Mesh bitstream.
pub const DRACO_MESH_BITSTREAM_VERSION_MINOR: u8 = 2;

/// Version assumed by buffers that were not told otherwise.
pub const DEFAULT_BITSTREAM_VERSION: (u8, u8) = (
    DRACO_MESH_BITSTREAM_VERSION_MAJOR,
    DRACO_MESH_BITSTREAM_VERSION_MINOR,
);

// =============================================================================
// Milestone Versions (for feature checks)
// =============================================================================

/// From v2.2 the bit-sequence size prefix is a varint instead of a fixed u64.
pub const VERSION_VARINT_BIT_SEQUENCE_SIZE: (u8, u8) = (2, 2);

/// Before v2.2 the normal-octahedron header carried a `center_value` field.
pub const VERSION_OCTAHEDRON_CENTER_VALUE_DROPPED: (u8, u8) = (2, 2);

/// Packs a (major, minor) pair into the 16-bit bitstream version.
#[inline]
pub const fn bitstream_version(major: u8, minor: u8) -> u16 {
    ((major as u16) << 8) | (minor as u16)
}

/// Returns true if (major, minor) >= target.
#[inline]
pub fn version_at_least(major: u8, minor: u8, target: (u8, u8)) -> bool {
    bitstream_version(major, minor) >= bitstream_version(target.0, target.1)
}

/// Returns true if (major, minor) < target.
#[inline]
pub fn version_less_than(major: u8, minor: u8, target: (u8, u8)) -> bool {
    !version_at_least(major, minor, target)
}
