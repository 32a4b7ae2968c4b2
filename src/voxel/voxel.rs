//! Voxel state type

/// Bits used by one voxel in the packed store
pub const VOXEL_BITS: u32 = 8;

/// Voxels packed into one 32-bit word
pub const VOXELS_PER_WORD: usize = (u32::BITS / VOXEL_BITS) as usize;

/// State of a single voxel
///
/// `Air` is encoded as zero so a zeroed buffer is an empty world and a
/// nonzero word always holds at least one non-air voxel.
#[repr(u8)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum VoxelState {
    #[default]
    Air = 0,
    Stone = 1,
    Dirt = 2,
    Grass = 3,
    Sand = 4,
    Wood = 5,
    Water = 6,
}

/// How a voxel behaves under the automaton
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Empty space that movers can enter
    Empty,
    /// Never moves, blocks movement
    Solid,
    /// Falls straight down
    Granular,
    /// Falls, then spreads sideways
    Fluid,
}

impl VoxelState {
    /// States a player can place, in number-key order
    pub const PLACEABLE: [VoxelState; 6] = [
        VoxelState::Stone,
        VoxelState::Dirt,
        VoxelState::Grass,
        VoxelState::Sand,
        VoxelState::Wood,
        VoxelState::Water,
    ];

    /// Decode stored bits. Unknown codes from foreign files read as stone.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0 => VoxelState::Air,
            1 => VoxelState::Stone,
            2 => VoxelState::Dirt,
            3 => VoxelState::Grass,
            4 => VoxelState::Sand,
            5 => VoxelState::Wood,
            6 => VoxelState::Water,
            _ => VoxelState::Stone,
        }
    }

    /// Encoded bits
    pub fn bits(self) -> u8 {
        self as u8
    }

    /// Check if voxel is empty (air)
    pub fn is_air(self) -> bool {
        self == VoxelState::Air
    }

    /// Automaton behaviour of this state
    pub fn phase(self) -> Phase {
        match self {
            VoxelState::Air => Phase::Empty,
            VoxelState::Sand => Phase::Granular,
            VoxelState::Water => Phase::Fluid,
            VoxelState::Stone | VoxelState::Dirt | VoxelState::Grass | VoxelState::Wood => Phase::Solid,
        }
    }
}
