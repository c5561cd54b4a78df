// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame preprocessing for MoveNet

use image::{imageops::FilterType, DynamicImage};
use ndarray::Array4;

/// MoveNet Lightning input size
pub const MOVENET_INPUT_SIZE: u32 = 192;

/// Convert a decoded frame into a MoveNet input tensor
///
/// - RGB, resized to `size`x`size`
/// - `[1, size, size, 3]` f32 tensor with raw 0.0-255.0 values
pub fn preprocess_for_movenet(frame: &DynamicImage, size: u32) -> Array4<f32> {
    let rgb = frame
        .resize_exact(size, size, FilterType::Triangle)
        .to_rgb8();

    let mut tensor = Array4::<f32>::zeros((1, size as usize, size as usize, 3));
    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, y as usize, x as usize, c]] = pixel[c] as f32;
        }
    }

    tensor
}
