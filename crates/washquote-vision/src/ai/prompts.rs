//! AI prompts for exterior surface estimation
//!
//! The user prompt names the service so the model only measures the surfaces
//! that service cleans (e.g. glass for "windows", flat paving for "driveway").
//! The JSON template uses placeholders, not example numbers, so the model
//! does not echo template values back.

use washquote_types::ServiceType;

/// System instruction shared by every request
pub const SYSTEM_PROMPT: &str = "You are an experienced estimator for an exterior cleaning \
     business (pressure washing, soft washing, window, roof and gutter cleaning). \
     You look at customer photos of a property and estimate the visible surface \
     area that would be cleaned and how difficult the job is. \
     You always answer with a single JSON object and nothing else.";

/// What each service measures, used to focus the model
fn surface_hint(service: &ServiceType) -> &'static str {
    match service {
        ServiceType::House => {
            "the exterior wall siding of the house (exclude windows, roof and ground)"
        }
        ServiceType::Windows => "the glass area of all visible windows and glass doors",
        ServiceType::Roof => "the roof surface, accounting for pitch where visible",
        ServiceType::Driveway => "the driveway and adjoining flat paved areas",
        ServiceType::Gutters => {
            "the gutters and downspouts, converted to an equivalent square footage"
        }
        ServiceType::Other(_) => "the surfaces a professional would clean for this service",
    }
}

/// Build the per-request instruction for a service
pub fn build_estimation_prompt(service: &ServiceType) -> String {
    format!(
        r#"Service requested: {service}

Estimate {hint}, using every photo provided. Photos may show the same surfaces
from different angles; do not count the same surface twice.

Use visible scale references (doors are about 7 ft tall, garage doors about
7 ft by 16 ft, cars about 15 ft long) to estimate dimensions.

Complexity scale:
1 = single storey, easy access, light soiling
3 = two storeys or moderate soiling, some obstacles
5 = steep or high surfaces, heavy staining, difficult access

Return strict JSON with exactly these keys:
{{"area_sqft": <number, square feet>, "complexity": <number from 1 to 5>, "notes": "<one or two sentences on what you measured and why>"}}"#,
        service = service.as_str(),
        hint = surface_hint(service),
    )
}
