use part_photo_common::Thumbnailer;
use std::io::Cursor;
use tracing::warn;

/// 長辺を `size` ピクセルに縮小したJPEGプレビューを作る
///
/// デコードできないデータは元のバイト列をそのままプレビューにする。
#[derive(Debug, Clone, Copy)]
pub struct ImageThumbnailer {
    size: u32,
}

impl ImageThumbnailer {
    pub fn new(size: u32) -> Self {
        Self { size: size.max(1) }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    fn encode(&self, data: &[u8]) -> Result<Vec<u8>, image::ImageError> {
        let image = image::load_from_memory(data)?;
        let thumb = image::DynamicImage::ImageRgb8(image.thumbnail(self.size, self.size).to_rgb8());

        let mut jpeg = Vec::new();
        thumb.write_to(&mut Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)?;
        Ok(jpeg)
    }
}

impl Thumbnailer for ImageThumbnailer {
    fn render(&self, data: &[u8]) -> Vec<u8> {
        match self.encode(data) {
            Ok(jpeg) => jpeg,
            Err(e) => {
                warn!(error = %e, bytes = data.len(), "サムネイルを生成できません。元データを使用します");
                data.to_vec()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_scales_longest_edge() {
        let preview = ImageThumbnailer::new(32).render(&png(128, 64));
        let decoded = image::load_from_memory(&preview).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }

    #[test]
    fn test_output_is_jpeg() {
        let preview = ImageThumbnailer::new(16).render(&png(20, 20));
        assert_eq!(&preview[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn test_undecodable_falls_back() {
        let preview = ImageThumbnailer::new(16).render(b"not an image");
        assert_eq!(preview, b"not an image".to_vec());
    }
}
