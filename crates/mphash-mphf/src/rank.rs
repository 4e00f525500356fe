//! Two-level rank directory over assigned vertices.
//!
//! Turns a perfect hash (a vertex index) into a minimal one (the number of
//! assigned vertices before it). Superblocks store absolute counts, small
//! blocks store counts relative to their superblock, and at most one small
//! block is scanned per query.

use crate::graph::UNASSIGNED;

const SUPERBLOCK_SIZE: usize = 256;
const SMALLBLOCK_SIZE: usize = 32;
const SMALLBLOCKS_PER_SUPERBLOCK: usize = SUPERBLOCK_SIZE / SMALLBLOCK_SIZE - 1;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankDirectory {
    superblocks: Vec<u32>,
    smallblocks: Vec<u8>,
}

impl RankDirectory {
    /// Build the directory for a vertex value array.
    pub fn build(values: &[u8]) -> Self {
        let mut superblocks = Vec::with_capacity(values.len() / SUPERBLOCK_SIZE);
        let mut smallblocks = Vec::with_capacity(values.len() / SMALLBLOCK_SIZE);
        let mut count = 0u32;

        for (i, &value) in values.iter().enumerate() {
            if i != 0 {
                if i % SUPERBLOCK_SIZE == 0 {
                    superblocks.push(count);
                } else if i % SMALLBLOCK_SIZE == 0 {
                    let base = superblocks.last().copied().unwrap_or(0);
                    // At most 224 vertices precede a small block in its superblock.
                    smallblocks.push((count - base) as u8);
                }
            }
            if value != UNASSIGNED {
                count += 1;
            }
        }

        Self {
            superblocks,
            smallblocks,
        }
    }

    /// Count assigned vertices in `values[..index]`.
    pub fn rank(&self, values: &[u8], index: usize) -> usize {
        let (superblock, offset) = (index / SUPERBLOCK_SIZE, index % SUPERBLOCK_SIZE);
        let mut result = match superblock {
            0 => 0,
            n => self.superblocks[n - 1] as usize,
        };

        let (smallblock, rest) = (offset / SMALLBLOCK_SIZE, offset % SMALLBLOCK_SIZE);
        if smallblock != 0 {
            result += self.smallblocks[superblock * SMALLBLOCKS_PER_SUPERBLOCK + smallblock - 1]
                as usize;
        }

        result
            + values[index - rest..index]
                .iter()
                .filter(|&&v| v != UNASSIGNED)
                .count()
    }
}
