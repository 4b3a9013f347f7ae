//! Output formatting module

use washquote_types::{EstimateResponse, OutputFormat, Quote, Result, ServiceType};

pub fn output_estimate(output_format: OutputFormat, result: &EstimateResponse) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(result)?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nEstimate Result");
    println!("===============");
    println!("Service:         {}", result.service);
    println!("Images analyzed: {}", result.images_analyzed);
    println!("Method:          {}", result.estimation_method.label());

    println!("\n--- Surface Estimate ---");
    println!("Area:            {:.0} sq ft", result.area_sqft);
    println!("Complexity:      {:.1} / 5", result.complexity);
    println!("------------------------");

    println!("Rate:            ${:.2} / sq ft", result.rate);
    println!("Complexity x:    {:.3}", result.complexity_factor);
    println!("Total:           ${:.2}", result.total);

    println!("\nNotes:");
    println!("{}", result.notes);

    Ok(())
}

pub fn output_quote(
    output_format: OutputFormat,
    service: &ServiceType,
    area_sqft: f64,
    complexity: f64,
    quote: &Quote,
) -> Result<()> {
    if output_format == OutputFormat::Json {
        let content = serde_json::to_string_pretty(&serde_json::json!({
            "service": service,
            "area_sqft": area_sqft,
            "complexity": complexity,
            "rate": quote.rate,
            "complexity_factor": quote.complexity_factor,
            "total": quote.total,
        }))?;
        println!("{}", content);
        return Ok(());
    }

    println!("\nQuote");
    println!("=====");
    println!("Service:         {}", service);
    println!("Area:            {:.0} sq ft", area_sqft);
    println!("Complexity:      {:.1} / 5", complexity);
    println!("Rate:            ${:.2} / sq ft", quote.rate);
    println!("Complexity x:    {:.3}", quote.complexity_factor);
    println!("Total:           ${:.2}", quote.total);

    Ok(())
}
