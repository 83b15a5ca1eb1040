//! Pie chart of the budget allocation.
//!
//! Provides:
//! - The geometry of each category's slice, starting at 12 o'clock and
//!   running clockwise in category order
//! - The legend with each category's share of the monthly budget
//! - SVG rendering of both with maud

use maud::{Markup, html};

use crate::{
    budget::allocation::{BudgetAllocation, ExpenseCategory, MAX_TOTAL_PERCENTAGE},
    html::format_currency,
};

const START_ANGLE_DEGREES: f64 = -90.0;
const BACKGROUND_COLOR: &str = "#374151";

/// A point in SVG user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Distance from the left edge.
    pub x: f64,
    /// Distance from the top edge.
    pub y: f64,
}

/// The size and position of the pie.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieChart {
    /// The centre of the pie.
    pub center: Point,
    /// The radius of the pie.
    pub radius: f64,
    /// The width and height of the SVG.
    pub size: f64,
}

impl Default for PieChart {
    fn default() -> Self {
        Self {
            center: Point { x: 100.0, y: 100.0 },
            radius: 90.0,
            size: 200.0,
        }
    }
}

/// The outline of a slice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SliceShape {
    /// The whole pie, drawn as two half circles.
    FullCircle {
        /// The centre of the circle.
        center: Point,
        /// The radius of the circle.
        radius: f64,
    },
    /// A circular sector.
    Wedge {
        /// The tip of the wedge.
        center: Point,
        /// The radius of the pie.
        radius: f64,
        /// Where the arc starts.
        start: Point,
        /// Where the arc ends, clockwise from `start`.
        end: Point,
        /// Whether the wedge covers more than half the pie.
        large_arc: bool,
    },
}

impl SliceShape {
    /// The SVG path data that draws the shape.
    pub fn path_data(&self) -> String {
        match self {
            SliceShape::FullCircle { center, radius } => format!(
                "M {} {} m {} 0 a {r} {r} 0 1 0 {} 0 a {r} {r} 0 1 0 {} 0",
                fmt_number(center.x),
                fmt_number(center.y),
                fmt_number(-radius),
                fmt_number(2.0 * radius),
                fmt_number(-2.0 * radius),
                r = fmt_number(*radius),
            ),
            SliceShape::Wedge {
                center,
                radius,
                start,
                end,
                large_arc,
            } => format!(
                "M {} {} L {} {} A {r} {r} 0 {} 1 {} {} Z",
                fmt_number(center.x),
                fmt_number(center.y),
                fmt_number(start.x),
                fmt_number(start.y),
                u8::from(*large_arc),
                fmt_number(end.x),
                fmt_number(end.y),
                r = fmt_number(*radius),
            ),
        }
    }
}

/// One category's slice of the pie.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    /// The category the slice stands for.
    pub category: ExpenseCategory,
    /// The category's share of the budget.
    pub percentage: u32,
    /// The angle the slice spans.
    pub sweep_degrees: f64,
    /// The category's share of the monthly budget in dollars.
    pub allocated_amount: f64,
    /// The outline of the slice.
    pub shape: SliceShape,
}

/// One row of the chart legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    /// The category.
    pub category: ExpenseCategory,
    /// The category's share of the budget.
    pub percentage: u32,
    /// The category's share of the monthly budget in dollars.
    pub allocated_amount: f64,
}

impl PieChart {
    /// The point on the circle at `degrees`, measured clockwise from 3 o'clock.
    pub fn point_at(&self, degrees: f64) -> Point {
        let radians = degrees.to_radians();

        Point {
            x: self.center.x + self.radius * radians.cos(),
            y: self.center.y + self.radius * radians.sin(),
        }
    }

    /// Compute the slices for `allocation`, skipping empty categories.
    pub fn slices(&self, allocation: &BudgetAllocation, monthly_budget: f64) -> Vec<PieSlice> {
        let mut start_angle = START_ANGLE_DEGREES;
        let mut slices = Vec::new();

        for (category, percentage) in allocation.iter() {
            if percentage == 0 {
                continue;
            }

            let sweep_degrees = f64::from(percentage) * 360.0 / 100.0;

            let shape = if percentage >= MAX_TOTAL_PERCENTAGE {
                SliceShape::FullCircle {
                    center: self.center,
                    radius: self.radius,
                }
            } else {
                SliceShape::Wedge {
                    center: self.center,
                    radius: self.radius,
                    start: self.point_at(start_angle),
                    end: self.point_at(start_angle + sweep_degrees),
                    large_arc: sweep_degrees > 180.0,
                }
            };

            slices.push(PieSlice {
                category,
                percentage,
                sweep_degrees,
                allocated_amount: allocated_amount(percentage, monthly_budget),
                shape,
            });

            start_angle += sweep_degrees;
        }

        slices
    }

    /// Render `slices` as an SVG on top of a grey background circle.
    pub fn render(&self, slices: &[PieSlice]) -> Markup {
        let view_box = format!("0 0 {0} {0}", fmt_number(self.size));

        html! {
            svg
                xmlns="http://www.w3.org/2000/svg"
                width=(fmt_number(self.size))
                height=(fmt_number(self.size))
                viewBox=(view_box)
                role="img"
                aria-label="Budget allocation"
            {
                circle
                    cx=(fmt_number(self.center.x))
                    cy=(fmt_number(self.center.y))
                    r=(fmt_number(self.radius))
                    fill=(BACKGROUND_COLOR) {}

                @for slice in slices {
                    path
                        d=(slice.shape.path_data())
                        fill=(slice.category.color())
                        stroke="white"
                        stroke-width="2"
                        data-category=(slice.category.name())
                    {
                        title { (slice.category) ": " (slice.percentage) "%" }
                    }
                }
            }
        }
    }
}

/// The legend rows for every category, including those with nothing allocated.
pub fn legend(allocation: &BudgetAllocation, monthly_budget: f64) -> Vec<LegendEntry> {
    allocation
        .iter()
        .map(|(category, percentage)| LegendEntry {
            category,
            percentage,
            allocated_amount: allocated_amount(percentage, monthly_budget),
        })
        .collect()
}

/// Render the legend as a list with a colour swatch per category.
pub fn render_legend(entries: &[LegendEntry]) -> Markup {
    html! {
        ul class="legend" {
            @for entry in entries {
                li data-category=(entry.category.name()) {
                    span
                        class="swatch"
                        style=(format!("background-color: {}", entry.category.color())) {}
                    span class="name" { (entry.category) }
                    span class="percentage" { (entry.percentage) "%" }
                    span class="amount" { (format_currency(entry.allocated_amount)) }
                }
            }
        }
    }
}

fn allocated_amount(percentage: u32, monthly_budget: f64) -> f64 {
    f64::from(percentage) / 100.0 * monthly_budget
}

/// Format a coordinate with at most two decimals and no trailing zeros.
fn fmt_number(number: f64) -> String {
    let formatted = format!("{number:.2}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');

    match trimmed {
        "-0" => "0".to_owned(),
        trimmed => trimmed.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use scraper::Selector;

    use crate::{
        budget::allocation::{BudgetAllocation, ExpenseCategory},
        test_utils::{assert_valid_html, parse_html_fragment},
    };

    use super::{PieChart, SliceShape, fmt_number, legend, render_legend};

    fn single_category(category: ExpenseCategory, percentage: u32) -> BudgetAllocation {
        let mut allocation = BudgetAllocation::empty();
        assert!(allocation.set_allocation(category, percentage));
        allocation
    }

    #[test]
    fn full_allocation_is_a_full_circle() {
        let chart = PieChart::default();

        let slices = chart.slices(&single_category(ExpenseCategory::Bills, 100), 800.0);

        assert_eq!(slices.len(), 1);
        assert!(matches!(slices[0].shape, SliceShape::FullCircle { .. }));
        assert_eq!(
            slices[0].shape.path_data(),
            "M 100 100 m -90 0 a 90 90 0 1 0 180 0 a 90 90 0 1 0 -180 0"
        );
        assert_eq!(slices[0].allocated_amount, 800.0);
    }

    #[test]
    fn default_allocation_has_six_wedges_covering_the_circle() {
        let chart = PieChart::default();

        let slices = chart.slices(&BudgetAllocation::default(), 1000.0);

        assert_eq!(slices.len(), 6);
        assert!(
            slices
                .iter()
                .all(|slice| matches!(slice.shape, SliceShape::Wedge { .. }))
        );
        let total_sweep: f64 = slices.iter().map(|slice| slice.sweep_degrees).sum();
        assert!((total_sweep - 360.0).abs() < 1e-9, "got {total_sweep}");
    }

    #[test]
    fn first_wedge_starts_at_twelve_o_clock() {
        let chart = PieChart::default();

        let slices = chart.slices(&BudgetAllocation::default(), 1000.0);

        assert_eq!(slices[0].category, ExpenseCategory::Food);
        assert_eq!(
            slices[0].shape.path_data(),
            "M 100 100 L 100 10 A 90 90 0 0 1 190 100 Z"
        );
    }

    #[test]
    fn wedges_are_contiguous() {
        let chart = PieChart::default();

        let slices = chart.slices(&BudgetAllocation::default(), 1000.0);

        for pair in slices.windows(2) {
            let (SliceShape::Wedge { end, .. }, SliceShape::Wedge { start, .. }) =
                (pair[0].shape, pair[1].shape)
            else {
                panic!("expected wedges");
            };
            assert!((end.x - start.x).abs() < 1e-9);
            assert!((end.y - start.y).abs() < 1e-9);
        }
    }

    #[test]
    fn large_arc_flag_set_past_half() {
        let chart = PieChart::default();
        let mut allocation = single_category(ExpenseCategory::Food, 60);
        allocation.set_allocation(ExpenseCategory::Other, 40);

        let slices = chart.slices(&allocation, 100.0);

        assert!(matches!(
            slices[0].shape,
            SliceShape::Wedge {
                large_arc: true,
                ..
            }
        ));
        assert!(matches!(
            slices[1].shape,
            SliceShape::Wedge {
                large_arc: false,
                ..
            }
        ));
    }

    #[test]
    fn empty_categories_are_skipped() {
        let chart = PieChart::default();

        let slices = chart.slices(&single_category(ExpenseCategory::Transport, 30), 100.0);

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].category, ExpenseCategory::Transport);
        assert!(chart.slices(&BudgetAllocation::empty(), 100.0).is_empty());
    }

    #[test]
    fn legend_lists_every_category() {
        let entries = legend(&single_category(ExpenseCategory::Food, 50), 400.0);

        assert_eq!(entries.len(), ExpenseCategory::ALL.len());
        assert_eq!(entries[0].allocated_amount, 200.0);
        assert_eq!(entries[1].allocated_amount, 0.0);
    }

    #[test]
    fn renders_one_path_per_slice() {
        let chart = PieChart::default();
        let slices = chart.slices(&BudgetAllocation::default(), 1000.0);

        let markup = chart.render(&slices).into_string();

        let html = parse_html_fragment(&markup);
        assert_valid_html(&html);
        let circle_selector = Selector::parse("svg > circle").unwrap();
        let circle = html.select(&circle_selector).next().expect("no background");
        assert_eq!(circle.value().attr("fill"), Some("#374151"));
        let path_selector = Selector::parse("svg path").unwrap();
        let fills: Vec<_> = html
            .select(&path_selector)
            .filter_map(|path| path.value().attr("fill"))
            .collect();
        assert_eq!(
            fills,
            ["#ef4444", "#3b82f6", "#10b981", "#f59e0b", "#8b5cf6", "#6b7280"]
        );
    }

    #[test]
    fn renders_legend_amounts() {
        let entries = legend(&BudgetAllocation::default(), 1000.0);

        let markup = render_legend(&entries).into_string();

        let html = parse_html_fragment(&markup);
        assert_valid_html(&html);
        let selector = Selector::parse("li[data-category=Food] .amount").unwrap();
        let amount = html.select(&selector).next().expect("no Food entry");
        assert_eq!(amount.text().collect::<String>(), "$250.00");
    }

    #[test]
    fn formats_numbers_compactly() {
        assert_eq!(fmt_number(100.0), "100");
        assert_eq!(fmt_number(12.5), "12.5");
        assert_eq!(fmt_number(12.3456), "12.35");
        assert_eq!(fmt_number(-0.001), "0");
    }
}
