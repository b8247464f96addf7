use reqwest::Method;

use crate::common::{ALLOWED_ORIGIN, Image, TestApp, TestResponse, routes};

mod static_files {
    use super::*;

    #[tokio::test]
    async fn uploaded_image_is_served_under_static_prefix() {
        let app = TestApp::spawn().await;
        app.create_recipe("Tarta", Some(Image::png("t.png", b"png bytes")))
            .await;
        let url = app.get(routes::RECIPES).await.body[0]["imagen"]
            .as_str()
            .unwrap()
            .to_string();

        let res = app.client.get(app.url(&url)).send().await.unwrap();

        assert_eq!(res.status(), 200);
        assert_eq!(
            res.headers()["content-type"].to_str().unwrap(),
            "image/png"
        );
        assert_eq!(res.bytes().await.unwrap().as_ref(), b"png bytes");
    }

    #[tokio::test]
    async fn unknown_static_file_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get("/static/nope.png").await;

        assert_eq!(res.status, 404);
    }
}

mod cors {
    use super::*;

    async fn preflight(app: &TestApp, origin: &str) -> TestResponse {
        let res = app
            .client
            .request(Method::OPTIONS, app.url(routes::RECIPES))
            .header("Origin", origin)
            .header("Access-Control-Request-Method", "POST")
            .header("Access-Control-Request-Headers", "authorization")
            .send()
            .await
            .expect("Failed to send preflight request");
        TestResponse::from_response(res).await
    }

    #[tokio::test]
    async fn preflight_from_allowed_origin_is_accepted() {
        let app = TestApp::spawn().await;

        let res = preflight(&app, ALLOWED_ORIGIN).await;

        assert_eq!(res.status, 200);
        assert_eq!(
            res.header("access-control-allow-origin"),
            Some(ALLOWED_ORIGIN)
        );
        assert_eq!(res.header("access-control-allow-credentials"), Some("true"));
        assert_eq!(res.header("access-control-allow-methods"), Some("POST"));
        assert_eq!(
            res.header("access-control-allow-headers"),
            Some("authorization")
        );
    }

    #[tokio::test]
    async fn preflight_from_other_origin_gets_no_allow_origin() {
        let app = TestApp::spawn().await;

        let res = preflight(&app, "http://evil.example").await;

        assert!(res.header("access-control-allow-origin").is_none());
    }
}

mod api_docs {
    use super::*;

    #[tokio::test]
    async fn openapi_document_lists_recipe_operations() {
        let app = TestApp::spawn().await;

        let res = app.get(routes::OPENAPI).await;

        assert_eq!(res.status, 200);
        let paths = &res.body["paths"];
        assert!(paths["/recetas"]["get"].is_object());
        assert!(paths["/recetas"]["post"].is_object());
        assert!(paths["/recetas/{id}"]["put"].is_object());
        assert!(paths["/recetas/{id}"]["delete"].is_object());
        assert_eq!(
            res.body["components"]["securitySchemes"]["basic"]["scheme"],
            "basic"
        );
    }
}
