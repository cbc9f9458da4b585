use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PricingProduct {
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    #[validate(range(min = 0.0))]
    #[schema(example = 80.0)]
    pub precio_costo: f64,
    #[validate(range(min = 0.0))]
    #[schema(example = 95.0)]
    pub precio_actual: f64,
    /// Units sold per day.
    #[validate(range(min = 0.0))]
    #[schema(example = 0.6)]
    pub rotacion_diaria: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PricingRequest {
    /// Accepted for compatibility with the consumer; not used by the calculation.
    #[validate(range(min = 1))]
    #[schema(example = 90)]
    pub history_days: i64,
    /// Fractional markup over cost, e.g. 0.3 for 30%.
    #[validate(range(min = 0.0))]
    #[schema(example = 0.2)]
    pub target_margin: f64,
    #[validate]
    pub productos: Vec<PricingProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingRecommendation {
    pub producto_id: i64,
    pub producto_nombre: Option<String>,
    pub precio_sugerido: f64,
    pub diferencia: f64,
    pub margen_estimado: Option<f64>,
    pub rotacion_diaria: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PricingResponse {
    pub recomendaciones: Vec<PricingRecommendation>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn negative_cost_fails_validation() {
        let req: PricingRequest = serde_json::from_value(json!({
            "history_days": 90,
            "target_margin": 0.3,
            "productos": [{
                "producto_id": 1,
                "precio_costo": -5.0,
                "precio_actual": 10.0,
                "rotacion_diaria": 0.1
            }]
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn zero_margin_is_accepted() {
        let req: PricingRequest = serde_json::from_value(json!({
            "history_days": 1,
            "target_margin": 0.0,
            "productos": []
        }))
        .unwrap();
        assert!(req.validate().is_ok());
    }

    #[test]
    fn absent_margin_serializes_as_null() {
        let rec = PricingRecommendation {
            producto_id: 1,
            producto_nombre: Some("Cafe".into()),
            precio_sugerido: 0.0,
            diferencia: 0.0,
            margen_estimado: None,
            rotacion_diaria: 0.0,
        };
        let value = serde_json::to_value(rec).unwrap();
        assert!(value["margen_estimado"].is_null());
        assert_eq!(value["producto_nombre"], "Cafe");
    }
}
