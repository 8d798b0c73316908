use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for the record handed to the dashboard
    let mut types = Vec::new();

    // Profile types
    types.push(clean_type(RawEntry::export_to_string()?));
    types.push(clean_type(ProfileRecord::export_to_string()?));

    // Section types
    types.push(clean_type(SectionKind::export_to_string()?));

    // Report types
    types.push(clean_type(ValidationReport::export_to_string()?));
    types.push(clean_type(PipelineStage::export_to_string()?));
    types.push(clean_type(EmailStrategy::export_to_string()?));
    types.push(clean_type(PipelineDiagnostics::export_to_string()?));
    types.push(clean_type(PipelineOutput::export_to_string()?));

    let output_dir = Path::new("../dashboard/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    // Everything lands in one file, so cross-type imports are dropped
    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
