use actix_web::{
    App, HttpMessage,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header,
    middleware::{Next, from_fn},
    web,
};

use tracing_actix_web::{RequestId, TracingLogger};

use actix_cors::Cors;

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::openapi::{Components, OpenApi, Server};
use utoipa_actix_web::AppExt;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{self, AUTHORIZATION_COOKIE, ISSUER_KEY_HEADER, IssuerKey};
use crate::container::Container;

use std::sync::Arc;

pub fn create(
    container: Arc<Container>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    App::new()
        .into_utoipa_app()
        .openapi(docs())
        .configure(api::routes)
        .openapi_service(|api| {
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", api)
        })
        .into_app()
        .wrap(TracingLogger::default())
        .wrap(cors())
        .wrap(from_fn(request_headers))
        .app_data(api::json_config())
        .app_data(web::Data::new(container.authenticator.clone()))
        .app_data(web::Data::new(IssuerKey::new(container.issuer_key.clone())))
}

fn cors() -> Cors {
    Cors::default()
        .allowed_origin("http://localhost:8080")
        .allowed_methods(vec!["GET", "POST"])
        .supports_credentials()
        .allowed_headers(&[header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .block_on_origin_mismatch(false)
        .max_age(3600)
}

async fn request_headers(
    req: ServiceRequest,
    svc: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let mut res = svc.call(req).await?;

    // set by TracingLogger, which runs inside this middleware
    let request_id = res.request().extensions().get::<RequestId>().copied();

    if let Some(value) =
        request_id.and_then(|id| header::HeaderValue::from_str(&id.to_string()).ok())
    {
        res.headers_mut()
            .insert(header::HeaderName::from_static("x-request-id"), value);
    }
    Ok(res)
}

pub fn docs() -> OpenApi {
    let mut openapi = OpenApi::default();

    openapi.info.title = String::from("Short Auth API");
    openapi.info.description = Some(String::from("Session token issuance and validation"));
    openapi.info.version = String::from(env!("CARGO_PKG_VERSION"));

    openapi.servers = Some(vec![
        Server::builder()
            .description(Some("Localhost"))
            .url("http://localhost:8080")
            .build(),
    ]);
    openapi.components = Some(components());

    openapi
}

fn components() -> Components {
    Components::builder()
        .security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        )
        .security_scheme(
            "cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(AUTHORIZATION_COOKIE))),
        )
        .security_scheme(
            "issuer_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ISSUER_KEY_HEADER))),
        )
        .build()
}
