//! Estimate Service - core use case for photo-based quotes
//!
//! This service orchestrates the estimate workflow:
//! 1. Validate that photos were supplied
//! 2. Check that an inference credential is configured
//! 3. Ask the vision model for area and complexity (Smart Estimator on failure)
//! 4. Price the job from the rate tables
//! 5. Return the full breakdown

use crate::config::Config;
use std::sync::Arc;
use tracing::info;
use washquote_domain::{calculate_quote, clamp_complexity, PricingTables, SmartEstimatorTable};
use washquote_types::{Error, EstimateRequest, EstimateResponse, Quote, Result, ServiceType};
use washquote_vision::{estimate_surface, OpenAiBackend, VisionBackend};

/// Stateless request handler shared across requests
pub struct EstimateService {
    pricing: PricingTables,
    smart_estimator: SmartEstimatorTable,
    /// `None` when no inference credential is configured
    backend: Option<Arc<dyn VisionBackend>>,
}

impl EstimateService {
    pub fn new(
        pricing: PricingTables,
        smart_estimator: SmartEstimatorTable,
        backend: Option<Arc<dyn VisionBackend>>,
    ) -> Self {
        Self {
            pricing,
            smart_estimator,
            backend,
        }
    }

    /// Build the service from configuration.
    ///
    /// A missing credential is not an error here; estimate requests report it.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (pricing, smart_estimator) = config.load_pricing()?;

        let backend: Option<Arc<dyn VisionBackend>> = match config.openai_settings() {
            Some(settings) => Some(Arc::new(OpenAiBackend::new(settings)?)),
            None => None,
        };

        Ok(Self::new(pricing, smart_estimator, backend))
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Run the full estimate pipeline for one request
    pub async fn estimate(&self, request: EstimateRequest) -> Result<EstimateResponse> {
        if request.images.is_empty() {
            return Err(Error::no_images());
        }

        let backend = self.backend.as_deref().ok_or(Error::MissingApiKey)?;

        let estimate = estimate_surface(
            backend,
            &request.service,
            &request.images,
            &self.smart_estimator,
        )
        .await;

        let quote = calculate_quote(
            &self.pricing,
            &request.service,
            estimate.area_sqft,
            estimate.complexity,
        );

        info!(
            service = %request.service,
            method = estimate.method.label(),
            area_sqft = estimate.area_sqft,
            total = quote.total,
            "quote produced"
        );

        Ok(EstimateResponse::new(
            request.service,
            estimate,
            quote,
            request.images.len(),
        ))
    }

    /// Price a job from known measurements, without inference.
    ///
    /// Inputs get the same limits as model output: area floored at 0,
    /// complexity clamped to [1, 5].
    pub fn quote(&self, service: &ServiceType, area_sqft: f64, complexity: f64) -> Quote {
        calculate_quote(
            &self.pricing,
            service,
            area_sqft.max(0.0),
            clamp_complexity(complexity),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use washquote_types::{EstimationMethod, ImagePayload};
    use washquote_vision::BackendError;

    /// Backend returning a canned answer and counting calls
    struct CannedBackend {
        answer: Option<String>,
        fail: bool,
        calls: AtomicUsize,
        images_seen: AtomicUsize,
    }

    impl CannedBackend {
        fn ok(answer: &str) -> Arc<Self> {
            Arc::new(Self {
                answer: Some(answer.to_string()),
                fail: false,
                calls: AtomicUsize::new(0),
                images_seen: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                answer: None,
                fail: true,
                calls: AtomicUsize::new(0),
                images_seen: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl VisionBackend for CannedBackend {
        async fn send_prompt(
            &self,
            _system: &str,
            _prompt: &str,
            images: &[ImagePayload],
        ) -> std::result::Result<Option<String>, BackendError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.images_seen.store(images.len(), Ordering::SeqCst);
            if self.fail {
                Err(BackendError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            } else {
                Ok(self.answer.clone())
            }
        }

        fn model_name(&self) -> &str {
            "canned"
        }
    }

    fn service_with(backend: Option<Arc<dyn VisionBackend>>) -> EstimateService {
        EstimateService::new(
            PricingTables::default(),
            SmartEstimatorTable::default(),
            backend,
        )
    }

    fn photos(n: usize) -> Vec<ImagePayload> {
        (0..n)
            .map(|i| ImagePayload::new(vec![i as u8; 4], Some("image/png".to_string())))
            .collect()
    }

    #[tokio::test]
    async fn test_no_images_is_validation_error() {
        let backend = CannedBackend::ok("{}");
        let service = service_with(Some(backend.clone()));
        let err = service
            .estimate(EstimateRequest::new(ServiceType::House, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(err.public_message(), "No images uploaded");
        assert_eq!(backend.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_images_checked_before_credential() {
        let service = service_with(None);
        let err = service
            .estimate(EstimateRequest::new(ServiceType::House, vec![]))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn test_missing_credential() {
        let service = service_with(None);
        let err = service
            .estimate(EstimateRequest::new(ServiceType::House, photos(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MissingApiKey));
        assert_eq!(err.public_message(), "Missing OPENAI_API_KEY on server");
    }

    #[tokio::test]
    async fn test_ai_estimate_priced() {
        let backend = CannedBackend::ok(
            r#"{"area_sqft": 2000, "complexity": 3, "notes": "Two storey vinyl siding"}"#,
        );
        let service = service_with(Some(backend.clone()));
        let response = service
            .estimate(EstimateRequest::new(ServiceType::House, photos(3)))
            .await
            .unwrap();

        assert_eq!(response.estimation_method, EstimationMethod::Ai);
        assert_eq!(response.images_analyzed, 3);
        assert!((response.area_sqft - 2000.0).abs() < f64::EPSILON);
        assert!((response.rate - 0.15).abs() < f64::EPSILON);
        assert!((response.complexity_factor - 1.3).abs() < 1e-9);
        assert!((response.total - 390.0).abs() < 0.001);
        assert_eq!(response.notes, "Two storey vinyl siding");
        assert_eq!(backend.images_seen.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_driveway_fallback() {
        let service = service_with(Some(CannedBackend::failing()));
        let response = service
            .estimate(EstimateRequest::new(ServiceType::Driveway, photos(1)))
            .await
            .unwrap();

        let pricing = PricingTables::default();
        let expected = ((400.0 * pricing.rate_for(&ServiceType::Driveway)
            * pricing.complexity_factor(2.5))
        .max(pricing.min_job_fee)
            * 100.0)
            .round()
            / 100.0;

        assert_eq!(response.estimation_method, EstimationMethod::Smart);
        assert!((response.area_sqft - 400.0).abs() < f64::EPSILON);
        assert!((response.complexity - 2.5).abs() < f64::EPSILON);
        assert!((response.total - expected).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_unknown_service_fallback() {
        let service = service_with(Some(CannedBackend::failing()));
        let response = service
            .estimate(EstimateRequest::new(
                ServiceType::parse("unknownservice"),
                photos(2),
            ))
            .await
            .unwrap();

        assert_eq!(response.service.as_str(), "unknownservice");
        assert!((response.area_sqft - 1000.0).abs() < f64::EPSILON);
        assert!((response.rate - 0.15).abs() < f64::EPSILON);
        assert_eq!(response.images_analyzed, 2);
    }

    #[tokio::test]
    async fn test_malformed_answer_uses_defaults() {
        let service = service_with(Some(CannedBackend::ok("I think about 1200 sq ft")));
        let response = service
            .estimate(EstimateRequest::new(ServiceType::Roof, photos(1)))
            .await
            .unwrap();

        assert_eq!(response.estimation_method, EstimationMethod::Ai);
        assert!((response.area_sqft - 0.0).abs() < f64::EPSILON);
        assert!((response.complexity - 2.5).abs() < f64::EPSILON);
        assert!((response.total - 150.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_out_of_range_complexity_clamped() {
        let service = service_with(Some(CannedBackend::ok(
            r#"{"area_sqft": 500, "complexity": 12}"#,
        )));
        let response = service
            .estimate(EstimateRequest::new(ServiceType::Windows, photos(1)))
            .await
            .unwrap();
        assert!((response.complexity - 5.0).abs() < f64::EPSILON);
        assert!((response.complexity_factor - 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_manual_quote_limits_inputs() {
        let service = service_with(None);
        let negative = service.quote(&ServiceType::House, -100.0, 0.0);
        assert!((negative.total - 150.0).abs() < f64::EPSILON);
        assert!((negative.complexity_factor - 1.0).abs() < 1e-9);

        let big = service.quote(&ServiceType::House, 10000.0, 7.0);
        // 10000 x 0.15 x 1.6 = 2400
        assert!((big.total - 2400.0).abs() < 0.001);
    }

    #[test]
    fn test_from_config_without_key() {
        let service = EstimateService::from_config(&Config::default()).unwrap();
        assert!(!service.has_backend());
    }

    #[test]
    fn test_from_config_with_key() {
        let config = Config {
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let service = EstimateService::from_config(&config).unwrap();
        assert!(service.has_backend());
    }
}
