use {super::*, image::DynamicImage};

pub(crate) fn tensor_from_bytes(bytes: &[u8]) -> Result<Array4<f64>> {
  let image =
    image::load_from_memory(bytes).context("failed to decode image")?;

  tensor_from_image(&image)
}

pub(crate) fn tensor_from_image(image: &DynamicImage) -> Result<Array4<f64>> {
  let resized = image::imageops::resize(
    &grayscale(image),
    IMAGE_SIZE,
    IMAGE_SIZE,
    FilterType::CatmullRom,
  );

  let pixels: Vec<f64> = resized
    .into_raw()
    .into_iter()
    .map(|p| p as f64 / 255.0)
    .collect();

  let side = IMAGE_SIZE as usize;

  Ok(Array4::from_shape_vec((1, side, side, 1), pixels)?)
}

fn grayscale(image: &DynamicImage) -> GrayImage {
  let rgb = image.to_rgb8();

  GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
    let [r, g, b] = rgb.get_pixel(x, y).0;

    let luma =
      (r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471 + 0x8000) >> 16;

    Luma([luma as u8])
  })
}
