// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Raw carrier sample buffers and their 8×8 block partition.
//!
//! A [`Carrier`] is an interleaved 8-bit sample buffer (`RGBRGB…` for three
//! channels) with known width, height and channel count, as produced by an
//! external image decoder. Only full 8×8 blocks take part in embedding; the
//! right and bottom margins that do not fill a block are never touched.
//!
//! Blocks are visited in a fixed order: block rows top to bottom, block
//! columns left to right, and every channel of one block position before
//! moving to the next position.

pub mod dct;
pub mod error;

use dct::{Block, BLOCK_SIZE};
use error::{CarrierError, Result};

/// Maximum supported channels per pixel (gray, gray+alpha, RGB, RGBA).
pub const MAX_CHANNELS: usize = 4;

/// Position of one channel plane block in the partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCoord {
    pub block_row: usize,
    pub block_col: usize,
    pub channel: usize,
}

/// An interleaved 8-bit image buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Carrier {
    width: usize,
    height: usize,
    channels: usize,
    samples: Vec<u8>,
}

impl Carrier {
    /// Wrap a decoded sample buffer.
    ///
    /// # Errors
    /// - [`CarrierError::Empty`] if the buffer or a dimension is empty.
    /// - [`CarrierError::UnsupportedChannels`] outside `1..=4` channels.
    /// - [`CarrierError::LengthMismatch`] if the buffer does not match the geometry.
    pub fn new(width: usize, height: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 || samples.is_empty() {
            return Err(CarrierError::Empty);
        }
        if channels == 0 || channels > MAX_CHANNELS {
            return Err(CarrierError::UnsupportedChannels(channels));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|p| p.checked_mul(channels))
            .ok_or(CarrierError::LengthMismatch { expected: usize::MAX, actual: samples.len() })?;
        if samples.len() != expected {
            return Err(CarrierError::LengthMismatch { expected, actual: samples.len() });
        }
        Ok(Self { width, height, channels, samples })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of pixels (`width * height`).
    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Consume the carrier and hand the sample buffer back to the caller.
    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }

    /// Number of full 8×8 blocks horizontally.
    pub fn blocks_wide(&self) -> usize {
        self.width / BLOCK_SIZE
    }

    /// Number of full 8×8 blocks vertically.
    pub fn blocks_tall(&self) -> usize {
        self.height / BLOCK_SIZE
    }

    /// Total channel-plane blocks across all channels.
    pub fn total_blocks(&self) -> usize {
        self.blocks_wide() * self.blocks_tall() * self.channels
    }

    /// Map a position in the visiting order to its block coordinate.
    pub fn block_coord(&self, index: usize) -> Option<BlockCoord> {
        if index >= self.total_blocks() {
            return None;
        }
        let channel = index % self.channels;
        let position = index / self.channels;
        Some(BlockCoord {
            block_row: position / self.blocks_wide(),
            block_col: position % self.blocks_wide(),
            channel,
        })
    }

    /// Iterate block coordinates in the fixed visiting order.
    pub fn block_coords(&self) -> impl Iterator<Item = BlockCoord> + '_ {
        (0..self.total_blocks()).filter_map(move |i| self.block_coord(i))
    }

    /// Read one channel plane block as real-valued samples.
    pub fn read_block(&self, coord: BlockCoord) -> Result<Block> {
        self.check_coord(coord)?;
        let mut block = Block::zeros();
        let values = block.values_mut();
        for row in 0..BLOCK_SIZE {
            for col in 0..BLOCK_SIZE {
                values[row * BLOCK_SIZE + col] = self.samples[self.sample_index(coord, row, col)] as f64;
            }
        }
        Ok(block)
    }

    /// Write one channel plane block back, rounding and clamping to `0..=255`.
    pub fn write_block(&mut self, coord: BlockCoord, block: &Block) -> Result<()> {
        self.check_coord(coord)?;
        let values = block.values();
        for row in 0..BLOCK_SIZE {
            for col in 0..BLOCK_SIZE {
                let idx = self.sample_index(coord, row, col);
                self.samples[idx] = to_sample(values[row * BLOCK_SIZE + col]);
            }
        }
        Ok(())
    }

    fn check_coord(&self, coord: BlockCoord) -> Result<()> {
        if coord.block_row >= self.blocks_tall()
            || coord.block_col >= self.blocks_wide()
            || coord.channel >= self.channels
        {
            return Err(CarrierError::BlockOutOfBounds {
                block_row: coord.block_row,
                block_col: coord.block_col,
                channel: coord.channel,
            });
        }
        Ok(())
    }

    fn sample_index(&self, coord: BlockCoord, row: usize, col: usize) -> usize {
        let y = coord.block_row * BLOCK_SIZE + row;
        let x = coord.block_col * BLOCK_SIZE + col;
        (y * self.width + x) * self.channels + coord.channel
    }
}

/// Round a real sample to the nearest valid 8-bit value.
pub fn to_sample(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::dct::BLOCK_LEN;

    fn gradient(width: usize, height: usize, channels: usize) -> Carrier {
        let samples = (0..width * height * channels).map(|i| (i % 251) as u8).collect();
        Carrier::new(width, height, channels, samples).unwrap()
    }

    #[test]
    fn rejects_bad_geometry() {
        assert_eq!(Carrier::new(0, 4, 3, vec![0; 12]), Err(CarrierError::Empty));
        assert_eq!(Carrier::new(2, 2, 3, Vec::new()), Err(CarrierError::Empty));
        assert_eq!(Carrier::new(2, 2, 5, vec![0; 20]), Err(CarrierError::UnsupportedChannels(5)));
        assert_eq!(
            Carrier::new(2, 2, 3, vec![0; 11]),
            Err(CarrierError::LengthMismatch { expected: 12, actual: 11 })
        );
    }

    #[test]
    fn partial_blocks_excluded() {
        let c = gradient(20, 17, 3);
        assert_eq!(c.blocks_wide(), 2);
        assert_eq!(c.blocks_tall(), 2);
        assert_eq!(c.total_blocks(), 12);

        let tiny = gradient(7, 100, 1);
        assert_eq!(tiny.total_blocks(), 0);
        assert_eq!(tiny.block_coord(0), None);
    }

    #[test]
    fn visiting_order_is_channel_interleaved_row_major() {
        let c = gradient(16, 16, 3);
        let coords: Vec<_> = c.block_coords().collect();
        assert_eq!(coords.len(), 12);
        assert_eq!(coords[0], BlockCoord { block_row: 0, block_col: 0, channel: 0 });
        assert_eq!(coords[2], BlockCoord { block_row: 0, block_col: 0, channel: 2 });
        assert_eq!(coords[3], BlockCoord { block_row: 0, block_col: 1, channel: 0 });
        assert_eq!(coords[6], BlockCoord { block_row: 1, block_col: 0, channel: 0 });
        assert_eq!(coords[11], BlockCoord { block_row: 1, block_col: 1, channel: 2 });
    }

    #[test]
    fn read_write_block_roundtrip() {
        let mut c = gradient(16, 8, 3);
        let coord = BlockCoord { block_row: 0, block_col: 1, channel: 1 };
        let original = c.clone();

        let block = c.read_block(coord).unwrap();
        // Pixel (x=8, y=0), channel 1.
        assert_eq!(block.get(0, 0), original.samples()[(8 * 3) + 1] as f64);

        c.write_block(coord, &block).unwrap();
        assert_eq!(c, original);
    }

    #[test]
    fn write_block_clamps_and_leaves_other_channels() {
        let mut c = gradient(8, 8, 2);
        let before = c.clone();
        let coord = BlockCoord { block_row: 0, block_col: 0, channel: 0 };
        c.write_block(coord, &Block::new([300.0; BLOCK_LEN])).unwrap();

        for (i, (&a, &b)) in c.samples().iter().zip(before.samples()).enumerate() {
            if i % 2 == 0 {
                assert_eq!(a, 255);
            } else {
                assert_eq!(a, b, "channel 1 sample {i} changed");
            }
        }
    }

    #[test]
    fn out_of_bounds_block_is_rejected() {
        let c = gradient(8, 8, 1);
        let coord = BlockCoord { block_row: 1, block_col: 0, channel: 0 };
        assert!(matches!(c.read_block(coord), Err(CarrierError::BlockOutOfBounds { .. })));
    }

    #[test]
    fn to_sample_rounds_and_clamps() {
        assert_eq!(to_sample(-3.0), 0);
        assert_eq!(to_sample(12.49), 12);
        assert_eq!(to_sample(12.5), 13);
        assert_eq!(to_sample(999.0), 255);
    }
}
