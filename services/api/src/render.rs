use crate::cli::{OutputFormat, RankArgs};
use crate::infra::build_snapshot;
use phone_match::catalog::Catalog;
use phone_match::config::AppConfig;
use phone_match::decision::constraints::sanitize_amount;
use phone_match::decision::{
    ConstraintSet, DecisionEngine, DecisionSnapshot, PresetView, RankedResultsView, TraitView,
};
use phone_match::error::AppError;
use serde::Serialize;
use std::io::Write;

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        os,
        condition,
        budget_min,
        budget_max,
        screen,
        exclude_brands,
        preset,
        weights,
        sub_weights,
        catalog,
        format,
    } = args;

    let config = AppConfig::load()?;
    let catalog_path = catalog.or(config.catalog.path);
    let catalog = Catalog::load(catalog_path.as_deref())?;
    let engine = DecisionEngine::new(config.engine);

    let mut constraints = ConstraintSet {
        os,
        condition,
        screen,
        ..ConstraintSet::default()
    };
    if let Some(raw) = budget_min.as_deref() {
        constraints.budget_min = sanitize_amount(raw);
    }
    if let Some(raw) = budget_max.as_deref() {
        constraints.budget_max = sanitize_amount(raw);
    }
    for brand in &exclude_brands {
        constraints.excluded_brands.insert(brand);
    }

    let mut snapshot = build_snapshot(constraints, preset, weights, sub_weights)?;
    let adjusted = engine.normalize(&mut snapshot);
    let results = engine.evaluate(&catalog, &snapshot).view();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Text => write_text(&mut out, &snapshot, &results, adjusted),
        OutputFormat::Json => write_json(&mut out, &snapshot, &results),
        OutputFormat::Csv => write_csv(&mut out, &results),
    }
}

pub(crate) fn run_presets() -> Result<(), AppError> {
    println!("Weight presets");
    for preset in PresetView::all() {
        let weights = preset
            .weights
            .iter()
            .map(|(key, weight)| format!("{key}={weight}"))
            .collect::<Vec<_>>()
            .join(" ");
        println!("- {} ({}): {}", preset.key, preset.label, weights);
    }
    Ok(())
}

pub(crate) fn run_traits() -> Result<(), AppError> {
    println!("Traits and sub-factors");
    for view in TraitView::all() {
        let factors = view
            .sub_factors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        println!("- {} ({}): {}", view.key, view.label, factors);
    }
    Ok(())
}

#[derive(Serialize)]
struct RankOutput<'a> {
    constraints: &'a ConstraintSet,
    #[serde(flatten)]
    results: &'a RankedResultsView,
}

#[derive(Serialize)]
struct CsvRow<'a> {
    position: usize,
    id: &'a str,
    name: &'a str,
    os: &'a str,
    screen_size: &'a str,
    screen_class: &'a str,
    price: u32,
    score: u8,
    reasons: String,
}

fn output_error(err: impl std::fmt::Display) -> AppError {
    AppError::Output(err.to_string())
}

pub(crate) fn write_text<W: Write>(
    out: &mut W,
    snapshot: &DecisionSnapshot,
    results: &RankedResultsView,
    adjusted: bool,
) -> Result<(), AppError> {
    let constraints = &snapshot.constraints;
    writeln!(out, "Phone match results")?;
    writeln!(
        out,
        "Catalog: {} phones | {} matches | showing {}",
        results.catalog_size,
        results.total_matches,
        results.results.len()
    )?;
    let excluded = if constraints.excluded_brands.is_empty() {
        "none".to_string()
    } else {
        constraints
            .excluded_brands
            .iter()
            .collect::<Vec<_>>()
            .join(", ")
    };
    writeln!(
        out,
        "Constraints: OS {} | Condition {} | Budget ${}-${} | Screen {} | Excluded brands: {}",
        constraints.os.label(),
        constraints.condition.label(),
        constraints.budget_min,
        constraints.budget_max,
        constraints.screen.label(),
        excluded
    )?;
    if adjusted {
        writeln!(out, "Note: budget range was adjusted to fit the allowed limits.")?;
    }

    if results.results.is_empty() {
        writeln!(
            out,
            "\nNo phones match these constraints. Try widening the budget, screen size, or OS."
        )?;
        return Ok(());
    }

    for entry in &results.results {
        writeln!(out, "\n{}. {} - {}%", entry.position, entry.name, entry.score)?;
        writeln!(
            out,
            "   {} | {}\" {} | ~${}",
            entry.os_label,
            entry.screen_size,
            entry.screen_class.label(),
            entry.price
        )?;
        for reason in &entry.reasons {
            writeln!(out, "   - {reason}")?;
        }
        if !entry.strength_tags.is_empty() {
            writeln!(out, "   Tags: {}", entry.strength_tags.join(", "))?;
        }
    }
    Ok(())
}

pub(crate) fn write_json<W: Write>(
    out: &mut W,
    snapshot: &DecisionSnapshot,
    results: &RankedResultsView,
) -> Result<(), AppError> {
    let output = RankOutput {
        constraints: &snapshot.constraints,
        results,
    };
    serde_json::to_writer_pretty(&mut *out, &output).map_err(output_error)?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn write_csv<W: Write>(out: &mut W, results: &RankedResultsView) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(out);
    for entry in &results.results {
        writer
            .serialize(CsvRow {
                position: entry.position,
                id: &entry.id,
                name: &entry.name,
                os: entry.os_label,
                screen_size: &entry.screen_size,
                screen_class: entry.screen_class.label(),
                price: entry.price,
                score: entry.score,
                reasons: entry.reasons.join(" "),
            })
            .map_err(output_error)?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use phone_match::decision::{OsFilter, ScreenFilter, TraitKey};

    fn rank(snapshot: &DecisionSnapshot) -> RankedResultsView {
        let catalog = Catalog::bundled().expect("bundled catalog parses");
        DecisionEngine::default().evaluate(&catalog, snapshot).view()
    }

    #[test]
    fn text_output_lists_ranked_phones() {
        let snapshot = DecisionSnapshot::default();
        let results = rank(&snapshot);
        let mut out = Vec::new();
        write_text(&mut out, &snapshot, &results, false).expect("text renders");
        let text = String::from_utf8(out).expect("utf-8 output");

        assert!(text.starts_with("Phone match results"));
        assert!(text.contains("Excluded brands: none"));
        assert!(text.contains(&format!("\n1. {}", results.results[0].name)));
        assert!(text.contains("Strong match on"));
    }

    #[test]
    fn text_output_explains_empty_results() {
        let mut snapshot = DecisionSnapshot::default();
        snapshot.constraints.os = OsFilter::Ios;
        snapshot.constraints.screen = ScreenFilter::Large;
        snapshot.constraints.budget_min = 0;
        snapshot.constraints.budget_max = 100;
        let results = rank(&snapshot);
        let mut out = Vec::new();
        write_text(&mut out, &snapshot, &results, true).expect("text renders");
        let text = String::from_utf8(out).expect("utf-8 output");

        assert!(text.contains("Note: budget range was adjusted"));
        assert!(text.contains("No phones match these constraints"));
    }

    #[test]
    fn csv_output_has_one_row_per_result() {
        let snapshot = DecisionSnapshot::default();
        let results = rank(&snapshot);
        let mut out = Vec::new();
        write_csv(&mut out, &results).expect("csv renders");
        let text = String::from_utf8(out).expect("utf-8 output");

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("position,id,name,os,screen_size,screen_class,price,score,reasons")
        );
        assert_eq!(lines.count(), results.results.len());
    }

    #[test]
    fn json_output_echoes_constraints() {
        let mut snapshot = DecisionSnapshot::default();
        snapshot.weights.set(TraitKey::Camera, 10);
        let results = rank(&snapshot);
        let mut out = Vec::new();
        write_json(&mut out, &snapshot, &results).expect("json renders");
        let value: serde_json::Value = serde_json::from_slice(&out).expect("valid json");

        assert_eq!(value["constraints"]["budget_max"], 1000);
        assert_eq!(value["effective_weights"]["camera"], 10);
        assert_eq!(
            value["results"].as_array().map(Vec::len),
            Some(results.results.len())
        );
    }
}
