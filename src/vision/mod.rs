// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Frame decoding for submitted webcam images

pub mod image_utils;

pub use image_utils::{decode_base64_frame, decode_frame_bytes, detect_format, FrameInfo, ImageError};
