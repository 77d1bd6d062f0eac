use crate::errors::LevelError;
use crate::value_objects::label::LabelPlacement;
use crate::value_objects::level::Level;

pub const DEFAULT_MIN_SPACING_PX: f64 = 14.0;
/// Smallest spacing the push-down accepts.
pub const MIN_SPACING_PX: f64 = 1e-3;
/// Largest |y| a draw area may reach. Keeps `y + spacing` distinguishable from `y`.
pub const MAX_PIXEL: f64 = 1e12;

/// Vertical pixel band a renderer draws into. `top < bottom`, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawArea {
    pub top: f64,
    pub bottom: f64,
}

impl DrawArea {
    pub fn new(top: f64, bottom: f64) -> Result<Self, LevelError> {
        if !top.is_finite() || !bottom.is_finite() || top >= bottom {
            return Err(LevelError::invalid_parameter(
                "draw_area",
                format!("expected finite top < bottom, got top={top} bottom={bottom}"),
            ));
        }
        if top.abs() > MAX_PIXEL || bottom.abs() > MAX_PIXEL {
            return Err(LevelError::invalid_parameter(
                "draw_area",
                format!("bounds must lie within ±{MAX_PIXEL} px, got top={top} bottom={bottom}"),
            ));
        }
        Ok(Self { top, bottom })
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Price→pixel mapping supplied by the renderer.
pub trait PriceAxis {
    fn y_for_price(&self, price: f64) -> f64;
    fn area(&self) -> DrawArea;
}

/// Adapts any closure into a [`PriceAxis`].
pub struct FnAxis<F> {
    map: F,
    area: DrawArea,
}

impl<F: Fn(f64) -> f64> FnAxis<F> {
    pub fn new(area: DrawArea, map: F) -> Self {
        Self { map, area }
    }
}

impl<F: Fn(f64) -> f64> PriceAxis for FnAxis<F> {
    fn y_for_price(&self, price: f64) -> f64 {
        (self.map)(price)
    }

    fn area(&self) -> DrawArea {
        self.area
    }
}

/// Linear value scale: `max_price` at `area.top`, `min_price` at `area.bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearPriceAxis {
    pub area: DrawArea,
    pub min_price: f64,
    pub max_price: f64,
}

impl LinearPriceAxis {
    pub fn new(area: DrawArea, min_price: f64, max_price: f64) -> Result<Self, LevelError> {
        if !min_price.is_finite() || !max_price.is_finite() || min_price > max_price {
            return Err(LevelError::invalid_parameter(
                "price_range",
                format!("expected finite min <= max, got {min_price}..{max_price}"),
            ));
        }
        let max_price = if (max_price - min_price).abs() < 1e-12 {
            min_price + 1.0
        } else {
            max_price
        };
        Ok(Self {
            area,
            min_price,
            max_price,
        })
    }

    /// Axis spanning every given price, so nothing is clipped.
    pub fn fit<I>(area: DrawArea, prices: I) -> Result<Self, LevelError>
    where
        I: IntoIterator<Item = f64>,
    {
        let (lo, hi) = prices
            .into_iter()
            .filter(|p| p.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p), hi.max(p))
            });
        if lo > hi {
            return Err(LevelError::invalid_parameter(
                "price_range",
                "no finite prices to fit the axis to",
            ));
        }
        Self::new(area, lo, hi)
    }
}

impl PriceAxis for LinearPriceAxis {
    fn y_for_price(&self, price: f64) -> f64 {
        let span = self.max_price - self.min_price;
        self.area.bottom - (price - self.min_price) / span * self.area.height()
    }

    fn area(&self) -> DrawArea {
        self.area
    }
}

/// Places one label per visible level, pushing crowded labels downward.
///
/// Levels outside the draw area are dropped. The rest are ordered by y (ties
/// keep input order) and walked once: a label closer than `min_spacing` to
/// the one above it moves to exactly `min_spacing` below it. Labels in a
/// dense cluster may end up past `area.bottom`.
pub fn layout_labels<A: PriceAxis + ?Sized>(
    levels: &[Level],
    axis: &A,
    min_spacing: f64,
) -> Result<Vec<LabelPlacement>, LevelError> {
    if !min_spacing.is_finite() || min_spacing < MIN_SPACING_PX {
        return Err(LevelError::invalid_parameter(
            "min_spacing",
            format!("must be finite and >= {MIN_SPACING_PX}, got {min_spacing}"),
        ));
    }

    let area = axis.area();
    let mut placements: Vec<LabelPlacement> = levels
        .iter()
        .filter_map(|level| {
            let y = axis.y_for_price(level.price);
            area.contains(y).then(|| LabelPlacement {
                text: level.label.clone(),
                price: level.price,
                y,
                color: level.color.clone(),
            })
        })
        .collect();

    placements.sort_by(|a, b| a.y.total_cmp(&b.y));

    for i in 1..placements.len() {
        let prev_y = placements[i - 1].y;
        if placements[i].y - prev_y < min_spacing {
            placements[i].y = prev_y + min_spacing;
        }
    }

    Ok(placements)
}
