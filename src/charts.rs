//! Chart generation for the category and monthly summaries.
//!
//! Each view is built as an ECharts configuration and rendered to a
//! standalone HTML file. The dark chart theme follows the stored display
//! theme.

use std::path::{Path, PathBuf};

use charming::{
    Chart, HtmlRenderer,
    component::{Axis, Legend, Title},
    element::{AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
    theme::Theme as ChartTheme,
};

use crate::{
    Error,
    aggregation::{monthly_totals, totals_by_category},
    theme::Theme,
    transaction::Transaction,
};

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A doughnut chart of the amount totals per category.
pub fn category_chart(transactions: &[Transaction]) -> Chart {
    let totals = totals_by_category(transactions);
    let mut categories: Vec<&String> = totals.keys().collect();
    categories.sort();

    let data: Vec<(f64, &str)> = categories
        .iter()
        .map(|category| (totals[*category], category.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Totals by category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new())
        .series(Pie::new().name("Categories").radius(vec!["45%", "70%"]).data(data))
}

/// A bar chart of income against expenses per month bucket.
pub fn monthly_chart(transactions: &[Transaction]) -> Chart {
    let totals = monthly_totals(transactions);

    Chart::new()
        .title(Title::new().text("Monthly flow").subtext("All years combined"))
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .legend(Legend::new())
        .x_axis(Axis::new().type_(AxisType::Category).data(MONTH_LABELS.to_vec()))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Income").data(totals.income.to_vec()))
        .series(Bar::new().name("Expenses").data(totals.expenses.to_vec()))
}

/// Render both charts as standalone HTML files in `out_dir` and return the
/// written paths.
///
/// # Errors
/// Returns an [Error::ChartRender] if a chart cannot be rendered or
/// written.
pub fn render_charts(
    transactions: &[Transaction],
    theme: Theme,
    out_dir: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, Error> {
    let chart_theme = || match theme {
        Theme::Light => ChartTheme::Default,
        Theme::Dark => ChartTheme::Dark,
    };
    let out_dir = out_dir.as_ref();

    let views = [
        ("categorias.html", "Totals by category", category_chart(transactions)),
        ("mensual.html", "Monthly flow", monthly_chart(transactions)),
    ];

    let mut written = Vec::new();

    for (file_name, title, chart) in views {
        let path = out_dir.join(file_name);

        HtmlRenderer::new(title, 900, 600)
            .theme(chart_theme())
            .save(&chart, &path)
            .map_err(|error| Error::ChartRender(format!("{error:?}")))?;

        written.push(path);
    }

    Ok(written)
}
