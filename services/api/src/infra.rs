use metrics_exporter_prometheus::PrometheusHandle;
use phone_match::catalog::Catalog;
use phone_match::decision::{
    ConstraintSet, DecisionEngine, DecisionError, DecisionSnapshot, Preset, SubFactor, TraitKey,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) catalog: Catalog,
    pub(crate) engine: DecisionEngine,
}

/// Builds a snapshot the way the dials are edited: preset first, then
/// individual weight overrides, then sub-factor dials.
pub(crate) fn build_snapshot<W, S>(
    constraints: ConstraintSet,
    preset: Option<Preset>,
    weights: W,
    sub_weights: S,
) -> Result<DecisionSnapshot, DecisionError>
where
    W: IntoIterator<Item = (TraitKey, i64)>,
    S: IntoIterator<Item = (TraitKey, SubFactor, i64)>,
{
    let mut snapshot = DecisionSnapshot {
        constraints,
        weights: preset.map(Preset::weights).unwrap_or_default(),
        ..DecisionSnapshot::default()
    };
    for (key, value) in weights {
        snapshot.weights.set(key, value);
    }
    for (key, factor, value) in sub_weights {
        snapshot.sub_weights.set(key, factor, value)?;
    }
    Ok(snapshot)
}

/// Parses `trait=N`, e.g. `camera=9`.
pub(crate) fn parse_weight_override(raw: &str) -> Result<(TraitKey, i64), String> {
    let (key, value) = split_assignment(raw)?;
    let key = key.parse::<TraitKey>().map_err(|err| err.to_string())?;
    Ok((key, value))
}

/// Parses `trait.factor=N`, e.g. `battery.charging=10`.
pub(crate) fn parse_sub_weight(raw: &str) -> Result<(TraitKey, SubFactor, i64), String> {
    let (path, value) = split_assignment(raw)?;
    let (key, factor) = path
        .split_once('.')
        .ok_or_else(|| format!("expected trait.factor=N, got '{raw}'"))?;
    let key = key.parse::<TraitKey>().map_err(|err| err.to_string())?;
    let factor = factor.parse::<SubFactor>().map_err(|err| err.to_string())?;
    Ok((key, factor, value))
}

fn split_assignment(raw: &str) -> Result<(&str, i64), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got '{raw}'"))?;
    let value = value
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("failed to parse '{value}' as a weight ({err})"))?;
    Ok((name.trim(), value))
}
