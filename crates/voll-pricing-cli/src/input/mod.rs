pub mod file;
pub mod stdin;

use voll_pricing_core::pricing::PricingInputs;

/// Load pricing inputs from `--input` or piped stdin, sanitized.
pub fn load_inputs(path: Option<&str>) -> Result<PricingInputs, Box<dyn std::error::Error>> {
    let inputs: PricingInputs = if let Some(path) = path {
        file::read_document(path)?
    } else if let Some(data) = stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required".into());
    };
    Ok(inputs.sanitized())
}
