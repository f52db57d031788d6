//! Pixel data in client memory.
use crate::error::{GlStateError, Result};
use crate::format::{pixel_size, PixelFormat, PixelType};

/// Default row alignment of pixel data.
pub const DEFAULT_ALIGNMENT: usize = 4;

/// Number of bytes needed for an image with rows padded to `alignment`.
pub fn image_data_size(
    format: PixelFormat,
    ty: PixelType,
    size: &[i32],
    alignment: usize,
) -> usize {
    let Some((width, rest)) = size.split_first() else {
        return 0;
    };

    let row = pixel_size(format, ty) * (*width).max(0) as usize;
    let alignment = alignment.max(1);
    let padded_row = row.div_ceil(alignment) * alignment;
    rest.iter()
        .fold(padded_row, |total, extent| total * (*extent).max(0) as usize)
}

/// Borrowed pixel data to upload.
#[derive(Debug, Copy, Clone)]
pub struct ImageView<'a, const N: usize> {
    format: PixelFormat,
    ty: PixelType,
    size: [i32; N],
    data: &'a [u8],
    alignment: usize,
}

impl<'a, const N: usize> ImageView<'a, N> {
    /// Wrap pixel data with rows aligned to four bytes.
    pub fn new(format: PixelFormat, ty: PixelType, size: [i32; N], data: &'a [u8]) -> Result<Self> {
        Self::with_alignment(format, ty, size, data, DEFAULT_ALIGNMENT)
    }

    pub fn with_alignment(
        format: PixelFormat,
        ty: PixelType,
        size: [i32; N],
        data: &'a [u8],
        alignment: usize,
    ) -> Result<Self> {
        let expected = image_data_size(format, ty, &size, alignment);
        if data.len() < expected {
            return Err(GlStateError::ImageDataTooSmall {
                expected,
                actual: data.len(),
            });
        }

        Ok(ImageView {
            format,
            ty,
            size,
            data,
            alignment,
        })
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixel_type(&self) -> PixelType {
        self.ty
    }

    pub fn size(&self) -> [i32; N] {
        self.size
    }

    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    pub fn alignment(&self) -> usize {
        self.alignment
    }
}

/// Pixel data read back from a texture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image<const N: usize> {
    format: PixelFormat,
    ty: PixelType,
    size: [i32; N],
    data: Vec<u8>,
}

impl<const N: usize> Image<N> {
    /// Allocate zeroed storage for an image of the given size.
    pub fn zeroed(format: PixelFormat, ty: PixelType, size: [i32; N]) -> Self {
        let len = image_data_size(format, ty, &size, DEFAULT_ALIGNMENT);
        Image {
            format,
            ty,
            size,
            data: vec![0; len],
        }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixel_type(&self) -> PixelType {
        self.ty
    }

    pub fn size(&self) -> [i32; N] {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn view(&self) -> ImageView<'_, N> {
        ImageView {
            format: self.format,
            ty: self.ty,
            size: self.size,
            data: &self.data,
            alignment: DEFAULT_ALIGNMENT,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rows_are_padded() {
        // 3 RGB8 pixels = 9 bytes, padded to 12
        assert_eq!(
            image_data_size(PixelFormat::RGB, PixelType::UnsignedByte, &[3, 2], 4),
            24
        );
        assert_eq!(
            image_data_size(PixelFormat::RGB, PixelType::UnsignedByte, &[3, 2], 1),
            18
        );
        assert_eq!(
            image_data_size(PixelFormat::RGBA, PixelType::Float, &[2, 2, 3], 4),
            96
        );
        assert_eq!(image_data_size(PixelFormat::Red, PixelType::UnsignedByte, &[], 4), 0);
    }

    #[test]
    fn view_checks_size() {
        let data = [0u8; 23];
        let err = ImageView::new(PixelFormat::RGB, PixelType::UnsignedByte, [3, 2], &data);
        assert!(matches!(
            err,
            Err(GlStateError::ImageDataTooSmall {
                expected: 24,
                actual: 23
            })
        ));

        let data = [0u8; 24];
        let view = ImageView::new(PixelFormat::RGB, PixelType::UnsignedByte, [3, 2], &data).unwrap();
        assert_eq!(view.size(), [3, 2]);
    }

    #[test]
    fn zeroed_image() {
        let image = Image::zeroed(PixelFormat::RGBA, PixelType::UnsignedByte, [4, 4]);
        assert_eq!(image.data().len(), 64);
        assert_eq!(image.view().data().len(), 64);
    }
}
