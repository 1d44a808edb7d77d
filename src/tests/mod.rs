
pub mod utils;

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    test::{self, TestRequest},
};
use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use rstest::*;

use crate::api::ISSUER_KEY_HEADER;
use crate::container::Container;
use crate::services::timer::mock::TimerFake;
use crate::tests::utils::crypto::jwt_tokenizer;

const ISSUER_KEY: &str = "test-issuer-key";

pub struct TestContext {
    pub timer: Arc<TimerFake>,
    pub container: Arc<Container>,
}

#[fixture]
fn context() -> TestContext {
    let now = DateTime::parse_from_rfc3339("2006-01-02T15:04:05Z")
        .unwrap()
        .with_timezone(&Utc);
    let timer = Arc::new(TimerFake::new(now));

    let container = Arc::new(
        Container::new(Arc::new(jwt_tokenizer()), timer.clone(), TimeDelta::hours(1))
            .with_issuer_key(Some(ISSUER_KEY.to_string())),
    );

    TestContext { timer, container }
}

async fn request_token<S, B>(app: &S, id: &str, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = TestRequest::post()
        .uri("/api/v1/tokens")
        .insert_header((ISSUER_KEY_HEADER, ISSUER_KEY))
        .set_json(json!({
            "id": id,
            "email": email,
        }))
        .send_request(app)
        .await;

    let body: Value = test::read_body_json(res).await;

    body["token"].as_str().unwrap().to_owned()
}

#[derive(Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct Error {
    code: u16,
    message: String,
}
