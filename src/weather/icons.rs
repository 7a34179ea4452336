use super::IconProvider;
use crate::error::{IconError, NetworkError};
use crate::http;
use async_trait::async_trait;
use image::RgbaImage;
use image::imageops::FilterType;
use std::time::Duration;

pub const DEFAULT_ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";
pub const ICON_SIZE: u32 = 100;

/// Downloads `{base}/{code}@2x.png` condition icons.
pub struct HttpIconProvider {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpIconProvider {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, NetworkError> {
        Ok(Self {
            client: http::client(timeout)?,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn icon_url(&self, code: &str) -> String {
        format!("{}/{}@2x.png", self.base_url.trim_end_matches('/'), code)
    }
}

/// Decodes an icon and scales it to `ICON_SIZE` square.
pub fn decode_icon(bytes: &[u8]) -> Result<RgbaImage, IconError> {
    let image = image::load_from_memory(bytes)?;
    Ok(image
        .resize_exact(ICON_SIZE, ICON_SIZE, FilterType::Triangle)
        .to_rgba8())
}

#[async_trait]
impl IconProvider for HttpIconProvider {
    async fn fetch_icon(&self, code: &str) -> Result<RgbaImage, IconError> {
        let url = self.icon_url(code);
        let bytes = http::get_bytes(&self.client, &url, &url, self.timeout)
            .await
            .map_err(IconError::Network)?;
        decode_icon(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([255, 200, 0, 255]));
        let mut out = Cursor::new(Vec::new());
        image.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_icon_url() {
        let provider =
            HttpIconProvider::new("https://example.test/img/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            provider.icon_url("10d"),
            "https://example.test/img/10d@2x.png"
        );
    }

    #[test]
    fn test_decode_resizes() {
        let icon = decode_icon(&png_bytes(50, 50)).unwrap();
        assert_eq!(icon.dimensions(), (ICON_SIZE, ICON_SIZE));
        assert!(icon.get_pixel(50, 50)[3] > 250);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_icon(b"not a png").unwrap_err();
        assert_eq!(err.kind(), "Decode");
    }
}
