/// Fraction of a space width that successive checkers in a pile may cover.
pub const STACK_ALLOWANCE: f32 = 0.97;

pub const VERTICAL_BORDER: i32 = 7;

const BAR_WIDTH_RATIO: f32 = 1.25;

/// Derived layout constants for a board of given pixel dimensions.
///
/// All fields are integer pixels. The invariant maintained by [`compute`]
/// is that twelve space widths, the bar, and the two horizontal borders
/// tile the board width exactly.
///
/// [`compute`]: BoardMetrics::compute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoardMetrics {
    pub width: i32,
    pub height: i32,
    pub space_width: i32,
    pub bar_width: i32,
    pub horizontal_border: i32,
    pub vertical_border: i32,
    pub triangle_offset: i32,
    pub overlap: i32,
    pub inner_width: i32,
    pub inner_height: i32,
}

impl BoardMetrics {
    pub fn compute(width: i32, height: i32) -> Self {
        let vertical_border = VERTICAL_BORDER;
        let triangle_offset = (height - vertical_border * 2) / 15;

        // Grow the horizontal border until the per-piece overlap that fits
        // the vertical space (half table height across at most five stacked
        // pieces) no longer exceeds the allowance bound. Shrinking the space
        // width shrinks the bound, so this converges even on short boards.
        let mut horizontal_border = 0;
        let mut space_width;
        let mut overlap;
        loop {
            space_width = (width - horizontal_border * 2) / 13;
            overlap = ((height - vertical_border * 2 - triangle_offset * 2) / 2) / 5;
            let allowance = (space_width as f32 * STACK_ALLOWANCE) as i32;
            if overlap >= allowance {
                overlap = allowance;
                break;
            }
            horizontal_border += 1;
        }

        let mut bar_width = space_width;
        let extra = width - space_width * 12;
        let large_bar = (space_width as f32 * BAR_WIDTH_RATIO) as i32;
        if extra >= large_bar {
            bar_width = large_bar;
        }

        let mut horizontal_border = (width - space_width * 12 - bar_width) / 2;
        if horizontal_border < 0 {
            horizontal_border = 0;
        }

        // Fold any halving remainder into the bar so the row tiles exactly.
        let remainder = width - space_width * 12 - bar_width - horizontal_border * 2;
        if remainder > 0 {
            bar_width += remainder;
        }

        Self {
            width,
            height,
            space_width,
            bar_width,
            horizontal_border,
            vertical_border,
            triangle_offset,
            overlap,
            inner_width: width - horizontal_border * 2,
            inner_height: height - vertical_border * 2,
        }
    }

    /// Checkers are square, sized to the space width.
    pub fn checker_size(&self) -> i32 {
        self.space_width
    }

    /// Height of one table half, excluding the vertical borders.
    pub fn row_height(&self) -> i32 {
        (self.height - self.vertical_border * 2) / 2
    }
}
