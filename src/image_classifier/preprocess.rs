use crate::device_camera::interface::Frame;
use image::{imageops, RgbImage};
use tract_onnx::prelude::*;

/// Scales the whole frame into a `size`x`size` square, the way a canvas
/// `drawImage(video, 0, 0, size, size)` would.
pub fn draw_to_capture_square(frame: &Frame, size: u32) -> RgbImage {
    let image = frame.image();
    if image.width() == size && image.height() == size {
        image.clone()
    } else {
        imageops::resize(image, size, size, imageops::FilterType::Triangle)
    }
}

/// Top-left `width`x`height` region of `buffer`. Pixels outside the buffer are black.
pub fn crop_top_left(buffer: &RgbImage, width: u32, height: u32) -> RgbImage {
    let mut cropped = RgbImage::new(width, height);
    let copy_width = width.min(buffer.width());
    let copy_height = height.min(buffer.height());

    for y in 0..copy_height {
        for x in 0..copy_width {
            cropped.put_pixel(x, y, *buffer.get_pixel(x, y));
        }
    }

    cropped
}

/// NHWC float tensor with a batch of one, channels scaled into [0, 1].
pub fn image_to_tensor(image: &RgbImage) -> Tensor {
    let (width, height) = (image.width() as usize, image.height() as usize);
    tract_ndarray::Array4::from_shape_fn((1, height, width, 3), |(_, y, x, c)| {
        image.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
    })
    .into_tensor()
}

pub fn frame_to_tensor(frame: &Frame, capture_size: u32, input_shape: (u32, u32)) -> Tensor {
    let square = draw_to_capture_square(frame, capture_size);
    let (height, width) = input_shape;
    let cropped = crop_top_left(&square, width, height);
    image_to_tensor(&cropped)
}
