use std::io::{self, Write};

use anyhow::{Context, Result};
use tabwriter::TabWriter;
use tracing::info;
use xplan_core::{
    find_by_key, format_metric_value, short_technology_label, CalculationBasis, FieldLookup,
    ResultQuery, ResultRow, BUILD_CYCLE_KEY, TECHNOLOGY_KEY, YEAR_KEY,
};
use xplan_ui_common::view::{metric_label, pivot_to_tsv};
use xplan_ui_common::{baseline, ExportScope, Resolution, ResultsView, SortConfig};

use super::Session;
use xplan_cli::cli::{ResultFilter, ResultsCommands, ViewArgs};
use xplan_cli::common::{demo_notice, display_field, OutputFormat, PivotFormat};

pub fn handle(session: &Session, command: &ResultsCommands) -> Result<()> {
    match command {
        ResultsCommands::Years { scenario } => years(session, *scenario),
        ResultsCommands::Table {
            filter,
            view,
            format,
            all,
        } => table(session, filter, view, *format, *all),
        ResultsCommands::Pivot {
            filter,
            metric,
            view,
            format,
        } => pivot(session, filter, metric.as_deref(), view, *format),
        ResultsCommands::Units { scenario, year } => units(session, *scenario, *year),
    }
}

fn years(session: &Session, scenario: i64) -> Result<()> {
    let years = session
        .service()
        .client()
        .available_years(scenario)
        .with_context(|| format!("fetching available years for scenario {scenario}"))?;
    for year in years {
        println!("{year}");
    }
    Ok(())
}

/// Resolve the filter, printing the demo notice when fallback rows come back.
fn resolve(session: &Session, filter: &ResultFilter) -> Resolution {
    let basis = filter
        .basis
        .map(CalculationBasis::from)
        .unwrap_or_else(|| session.service().config().read().view.default_basis);

    let mut query = ResultQuery::new(filter.scenario, basis);
    if let Some(year) = filter.year {
        query = query.with_year(year);
    }
    if let Some(iteration) = filter.iteration {
        query = query.with_iteration(iteration);
    }

    info!("Resolving {} results for scenario {}", basis, filter.scenario);
    let resolution = session.block_on(session.service().resolver().resolve(query));
    if let Some(notice) = demo_notice(&resolution) {
        eprintln!("{notice}");
    }
    resolution
}

/// Build a view with the requested page size and page.
fn open_view(session: &Session, resolution: &Resolution, args: &ViewArgs) -> Result<ResultsView> {
    let mut view = session.service().new_view(resolution)?;
    if let Some(size) = args.page_size {
        view.set_page_size(size)?;
    }
    Ok(view)
}

/// Accept field keys, metric display names and metric wire keys.
fn sort_config(view: &ResultsView, args: &ViewArgs) -> Option<SortConfig> {
    let key = args.sort.as_deref()?;
    let key = find_by_key(view.catalog(), key).map_or(key, |d| d.name);
    Some(if args.desc {
        SortConfig::descending(key)
    } else {
        SortConfig::ascending(key)
    })
}

fn table(
    session: &Session,
    filter: &ResultFilter,
    args: &ViewArgs,
    format: Option<OutputFormat>,
    all: bool,
) -> Result<()> {
    let resolution = resolve(session, filter);
    let mut view = open_view(session, &resolution, args)?;
    if let Some(sort) = sort_config(&view, args) {
        view.set_sort(sort);
    }
    view.set_page(args.page);

    let format = match format {
        Some(format) => format,
        None if all => session.service().config().read().export.default_format.into(),
        None => OutputFormat::Table,
    };

    match format {
        OutputFormat::Table => print_rows(&view, all),
        OutputFormat::Json => {
            println!("{}", view.export_json()?);
            Ok(())
        }
        OutputFormat::Tsv => {
            let scope = if all { ExportScope::All } else { ExportScope::Page };
            println!("{}", view.export_tsv(scope));
            Ok(())
        }
    }
}

fn print_rows(view: &ResultsView, all: bool) -> Result<()> {
    let columns = view.columns();
    let mut writer = TabWriter::new(io::stdout());

    let header: Vec<&str> = columns.iter().map(|c| c.label.as_str()).collect();
    writeln!(writer, "{}", header.join("\t"))?;

    let page = view.page();
    let rows = if all { view.sorted_rows() } else { page.items.clone() };
    for row in &rows {
        let fields: Vec<String> = columns
            .iter()
            .map(|c| display_field(row.field(&c.key)))
            .collect();
        writeln!(writer, "{}", fields.join("\t"))?;
    }
    writer.flush()?;

    if !all {
        println!(
            "Page {} of {} ({} rows)",
            page.page,
            page.total_pages.max(1),
            page.total
        );
    }
    Ok(())
}

fn pivot(
    session: &Session,
    filter: &ResultFilter,
    metric: Option<&str>,
    args: &ViewArgs,
    format: PivotFormat,
) -> Result<()> {
    let resolution = resolve(session, filter);
    let mut view = open_view(session, &resolution, args)?;
    if let Some(metric) = metric {
        view.select_metric(metric);
    }
    if let Some(sort) = sort_config(&view, args) {
        view.set_pivot_sort(sort);
    }
    view.set_pivot_page(args.page);

    let Some((table, page)) = view.pivot_page() else {
        println!("No metrics in these results.");
        return Ok(());
    };

    match format {
        PivotFormat::Tsv => {
            println!("{}", pivot_to_tsv(&table));
            return Ok(());
        }
        PivotFormat::Table => {}
    }

    let mut writer = TabWriter::new(io::stdout());
    let mut header = vec!["Build Cycle".to_string()];
    header.extend(table.technologies.iter().map(|t| short_technology_label(t)));
    if table.has_baseline {
        header.push("Baseline".to_string());
    }
    writeln!(writer, "{}", header.join("\t"))?;

    for &cycle in &page.items {
        let mut fields = vec![cycle.to_string()];
        fields.extend(table.row(cycle).into_iter().map(|cell| match cell {
            Some(cell) if cell.is_selected() => format!("{}*", cell.display()),
            Some(cell) => cell.display(),
            None => String::new(),
        }));
        if table.has_baseline {
            fields.push(
                baseline(&table, cycle)
                    .map(format_metric_value)
                    .unwrap_or_default(),
            );
        }
        writeln!(writer, "{}", fields.join("\t"))?;
    }
    writer.flush()?;

    println!(
        "{} | Page {} of {} ({} build cycles) | * selected",
        metric_label(&table.metric),
        page.page,
        page.total_pages.max(1),
        page.total
    );
    Ok(())
}

fn units(session: &Session, scenario: i64, year: Option<i32>) -> Result<()> {
    let rows = session
        .service()
        .client()
        .unit_results(scenario, year)
        .with_context(|| format!("fetching unit changes for scenario {scenario}"))?;
    print_units(&rows)
}

fn print_units(rows: &[ResultRow]) -> Result<()> {
    let mut writer = TabWriter::new(io::stdout());
    writeln!(
        writer,
        "Technology\tBuild Cycle\tYear\t{}\t{}",
        metric_label("Capacity Added"),
        metric_label("Capacity Removed")
    )?;
    for row in rows {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}\t{}",
            display_field(row.field(TECHNOLOGY_KEY)),
            display_field(row.field(BUILD_CYCLE_KEY)),
            display_field(row.field(YEAR_KEY)),
            display_field(row.field("Capacity Added")),
            display_field(row.field("Capacity Removed")),
        )?;
    }
    writer.flush()?;
    Ok(())
}

