//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for workshop data:
//! - **Sales Chart**: Sale counts per displayed window
//! - **Income Chart**: Net income per displayed window
//! - **Best Sellers Chart**: Units sold for the top products
//! - **Expenses Chart**: Current window spending per category
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title, VisualMap, VisualMapPiece},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Line, bar},
};
use maud::{Markup, PreEscaped, html};

use crate::{
    analytics::{RankingEntry, SeriesPoint},
    expense::CategoryTotal,
    html::HeadElement,
    period::Period,
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
///
/// # Arguments
/// * `charts` - The charts to render containers for
///
/// # Returns
/// Maud markup containing a grid of chart container divs.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates the per-chart JavaScript initialization statements.
///
/// Each chart gets an ECharts instance with dark mode support and
/// responsive resizing.
fn chart_init_statements(charts: &[DashboardChart]) -> String {
    charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generates JavaScript initialization code for dashboard charts, deferred
/// until the page has loaded.
///
/// # Arguments
/// * `charts` - The charts to generate initialization scripts for
///
/// # Returns
/// HeadElement containing the initialization JavaScript.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        chart_init_statements(charts)
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Generates chart initialization code as an inline script element.
///
/// Used in HTMX partial responses, where no page load event will fire:
/// HTMX evaluates script elements found in swapped content, and the chart
/// containers precede the script within the same fragment.
pub(super) fn charts_inline_script(charts: &[DashboardChart]) -> Markup {
    html! {
        script { (PreEscaped(chart_init_statements(charts))) }
    }
}

/// Subtitle naming the displayed range for a period granularity.
fn period_subtext(period: Period) -> &'static str {
    match period {
        Period::Day => "Last twelve days",
        Period::Week => "Last eight weeks",
        Period::Month => "Last six months",
    }
}

pub(super) fn sales_chart(period: Period, series: &[SeriesPoint]) -> Chart {
    let labels: Vec<String> = series.iter().map(|point| point.label.clone()).collect();
    let values: Vec<i64> = series.iter().map(|point| point.count as i64).collect();

    Chart::new()
        .title(Title::new().text("Sales").subtext(period_subtext(period)))
        .tooltip(count_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Line::new().name("Sales").data(values))
}

pub(super) fn income_chart(period: Period, series: &[SeriesPoint]) -> Chart {
    let labels: Vec<String> = series.iter().map(|point| point.label.clone()).collect();
    let values: Vec<f64> = series.iter().map(|point| point.net_income).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Net income")
                .subtext(period_subtext(period)),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lte(-1).color("red"),
            VisualMapPiece::new().gte(0).color("green"),
        ]))
        .series(Line::new().name("Net income").data(values))
}

pub(super) fn best_sellers_chart(best_sellers: &[RankingEntry]) -> Chart {
    let labels: Vec<String> = best_sellers
        .iter()
        .map(|entry| entry.name.clone())
        .collect();
    let values: Vec<i64> = best_sellers
        .iter()
        .map(|entry| i64::from(entry.count))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Best sellers")
                .subtext("Units in completed sales"),
        )
        .tooltip(count_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(bar::Bar::new().name("Units sold").data(values))
}

pub(super) fn expenses_chart(categories: &[CategoryTotal], window_label: &str) -> Chart {
    let labels: Vec<&str> = categories
        .iter()
        .map(|total| total.category.as_str())
        .collect();
    let values: Vec<f64> = categories.iter().map(|total| total.total).collect();

    Chart::new()
        .title(Title::new().text("Expenses").subtext(window_label))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(bar::Bar::new().name("Spent").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('es-ES', {
              style: 'currency',
              currency: 'EUR'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

/// Creates a tooltip configuration for count values
fn count_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
