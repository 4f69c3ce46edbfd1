use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use voll_pricing_core::pricing::{calculate_pricing, PricingInputs};

use crate::input;

/// Arguments for a sensitivity grid over the pricing inputs
#[derive(Args)]
pub struct SensitivityArgs {
    /// Path to JSON or YAML base-case pricing inputs
    #[arg(long)]
    pub input: String,

    /// First variable as path:min:max:step, with a dotted camelCase path
    /// (e.g. "capacity.occupancyRate:40:90:10")
    #[arg(long)]
    pub var1: String,

    /// Second variable (optional, creates a 2D grid)
    #[arg(long)]
    pub var2: Option<String>,
}

#[derive(Debug, Clone)]
struct SensVar {
    path: String,
    min: Decimal,
    max: Decimal,
    step: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SensitivityOutput {
    var1_name: String,
    var2_name: Option<String>,
    results: Vec<SensitivityRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SensitivityRow {
    var1_value: Decimal,
    var2_value: Option<Decimal>,
    is_valid: bool,
    price_per_session: Option<Decimal>,
    target_revenue: Option<Decimal>,
    break_even_sessions: Option<Decimal>,
}

/// Cells per grid; keeps a typo'd step from running away.
const MAX_GRID_CELLS: usize = 10_000;

fn parse_sens_var(arg: &str) -> Result<SensVar, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be path:min:max:step, got '{}'",
            arg
        )
        .into());
    }
    let var = SensVar {
        path: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    };
    if var.step <= Decimal::ZERO {
        return Err(format!("Step for '{}' must be positive", var.path).into());
    }
    if var.max < var.min {
        return Err(format!("Max for '{}' is below min", var.path).into());
    }
    Ok(var)
}

fn generate_range(var: &SensVar) -> Vec<Decimal> {
    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max && values.len() <= MAX_GRID_CELLS {
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) => current = next,
            None => break,
        }
    }
    values
}

/// Set a dotted path such as `capacity.occupancyRate`, creating
/// intermediate objects when missing.
fn set_json_field(obj: &mut Value, path: &str, value: Decimal) -> Result<(), String> {
    let mut current = obj;
    let mut segments = path.split('.').peekable();
    while let Some(segment) = segments.next() {
        let map = current
            .as_object_mut()
            .ok_or_else(|| format!("'{}' does not point into an object", path))?;
        if segments.peek().is_none() {
            map.insert(segment.to_string(), Value::String(value.to_string()));
            return Ok(());
        }
        current = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    Err(format!("Empty variable path '{}'", path))
}

fn evaluate(
    base: &Value,
    var1: &SensVar,
    v1: Decimal,
    var2: Option<(&SensVar, Decimal)>,
) -> Result<SensitivityRow, Box<dyn std::error::Error>> {
    let mut json = base.clone();
    set_json_field(&mut json, &var1.path, v1)?;
    if let Some((var, v2)) = var2 {
        set_json_field(&mut json, &var.path, v2)?;
    }
    let inputs: PricingInputs = serde_json::from_value(json)?;
    let results = calculate_pricing(&inputs.sanitized());
    let valid = results.valid();
    Ok(SensitivityRow {
        var1_value: v1,
        var2_value: var2.map(|(_, v)| v),
        is_valid: results.is_valid(),
        price_per_session: valid.map(|r| r.price_per_session),
        target_revenue: valid.map(|r| r.target_revenue),
        break_even_sessions: valid.map(|r| r.break_even.sessions),
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let var1 = parse_sens_var(&args.var1)?;
    let var2 = args.var2.as_deref().map(parse_sens_var).transpose()?;

    let base_json = input::file::read_value(&args.input)?;

    let var1_range = generate_range(&var1);
    let var2_range = var2.as_ref().map(generate_range);

    let cells = var1_range.len() * var2_range.as_ref().map_or(1, |r| r.len());
    if cells > MAX_GRID_CELLS {
        return Err(format!(
            "Grid has {} cells; at most {} are allowed",
            cells, MAX_GRID_CELLS
        )
        .into());
    }
    tracing::debug!(cells, "running sensitivity grid");

    let mut results = Vec::with_capacity(cells);
    for &v1 in &var1_range {
        match (&var2, &var2_range) {
            (Some(v2_var), Some(v2_vals)) => {
                for &v2 in v2_vals {
                    results.push(evaluate(&base_json, &var1, v1, Some((v2_var, v2)))?);
                }
            }
            _ => results.push(evaluate(&base_json, &var1, v1, None)?),
        }
    }

    let output = SensitivityOutput {
        var1_name: var1.path,
        var2_name: var2.map(|v| v.path),
        results,
    };

    Ok(serde_json::to_value(output)?)
}
