/// Open figures, tracked by figure number
use crate::config::types::{HarnessError, Result};
use image::{DynamicImage, Rgba, RgbaImage};
use std::collections::BTreeMap;

/// Default face colour of a new figure
pub const DEFAULT_FACECOLOR: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An in-memory raster figure
#[derive(Debug, Clone)]
pub struct Figure {
    number: u32,
    canvas: DynamicImage,
    /// Background colour, when known
    facecolor: Option<Rgba<u8>>,
}

impl Figure {
    /// Blank RGBA figure filled with the default face colour
    pub fn new(number: u32, width: u32, height: u32) -> Self {
        let canvas = RgbaImage::from_pixel(width, height, DEFAULT_FACECOLOR);
        Self {
            number,
            canvas: DynamicImage::ImageRgba8(canvas),
            facecolor: Some(DEFAULT_FACECOLOR),
        }
    }

    /// Wrap an already rendered image; its background colour is unknown
    pub fn from_image(number: u32, image: DynamicImage) -> Self {
        Self {
            number,
            canvas: image,
            facecolor: None,
        }
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn canvas(&self) -> &DynamicImage {
        &self.canvas
    }

    /// Set the alpha of every background pixel
    ///
    /// Fails with `Unsupported` when the canvas has no alpha channel or the
    /// background colour is unknown.
    pub fn set_background_alpha(&mut self, alpha: u8) -> Result<()> {
        let facecolor = self.facecolor.ok_or_else(|| {
            HarnessError::Unsupported(format!("figure {} has no known background", self.number))
        })?;

        let canvas = match &mut self.canvas {
            DynamicImage::ImageRgba8(canvas) => canvas,
            _ => {
                return Err(HarnessError::Unsupported(format!(
                    "figure {} canvas has no 8-bit alpha channel",
                    self.number
                )))
            }
        };

        for pixel in canvas.pixels_mut() {
            if *pixel == facecolor {
                pixel.0[3] = alpha;
            }
        }

        let mut updated = facecolor;
        updated.0[3] = alpha;
        self.facecolor = Some(updated);
        Ok(())
    }
}

/// Registry of open figures ("all open figure managers")
#[derive(Debug, Default)]
pub struct FigureRegistry {
    figures: BTreeMap<u32, Figure>,
    next_number: u32,
}

impl FigureRegistry {
    pub fn new() -> Self {
        Self {
            figures: BTreeMap::new(),
            next_number: 1,
        }
    }

    /// Create a blank figure
    pub fn new_figure(&mut self, width: u32, height: u32) -> &mut Figure {
        let number = self.allocate_number();
        self.insert(Figure::new(number, width, height))
    }

    /// Register a rendered image as a new figure
    pub fn add_image(&mut self, image: DynamicImage) -> &mut Figure {
        let number = self.allocate_number();
        self.insert(Figure::from_image(number, image))
    }

    fn allocate_number(&mut self) -> u32 {
        let number = self.next_number.max(1);
        self.next_number = number + 1;
        number
    }

    fn insert(&mut self, figure: Figure) -> &mut Figure {
        self.figures.entry(figure.number()).or_insert(figure)
    }

    /// Open figures in figure-number order
    pub fn figures_mut(&mut self) -> impl Iterator<Item = &mut Figure> + '_ {
        self.figures.values_mut()
    }

    pub fn len(&self) -> usize {
        self.figures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.figures.is_empty()
    }
}
