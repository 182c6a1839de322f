use chrono::NaiveDate;
use httpmock::prelude::*;
use image::{DynamicImage, RgbImage};
use kantine::config::toml_config::{ItuConfig, KuaConfig};
use kantine::core::itu::ItuPipeline;
use kantine::core::kua::KuaPipeline;
use kantine::core::region::encode_png;
use kantine::core::render;
use kantine::domain::model::{EntryContent, WordBox};
use kantine::domain::ports::{MenuPipeline, OcrEngine};
use kantine::{MenuService, Result};

const KUA_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<div class="ContentBlock">
  <h3>Kantinen</h3>
  <p>Øster Farimagsgade 5</p>
  <p>Mandag</p><p>Fiskefrikadeller med remoulade</p><p>Rugbrød</p>
  <p>Tirsdag</p><p>Kylling i karry</p>
  <p>Onsdag</p>
  <p>Torsdag</p><p>Boller i karry</p>
  <p>Fredag</p><p>Fish and potatoes</p>
  <p>Der tages forbehold for ændringer</p>
</div>
<div class="ContentBlock">
  <h3>Folkek&oslash;kken</h3>
  <p>Hver dag kl. 17</p>
  <p>Mandag</p><p>Linsesuppe</p>
  <p>Tirsdag</p><p>Chili sin carne</p>
  <p>Onsdag</p><p>Risotto</p>
  <p>Torsdag</p><p>Dal</p>
  <p>Fredag</p><p>Pizza</p>
</div>
<div class="ContentBlock"><p>Følg os på Instagram</p></div>
</body></html>"#;

struct StaticOcr {
    week: u32,
}

impl OcrEngine for StaticOcr {
    fn image_to_string(&self, _image: &DynamicImage) -> Result<String> {
        Ok(format!("Week {}", self.week))
    }

    fn image_to_words(&self, _image: &DynamicImage) -> Result<Vec<WordBox>> {
        Ok(vec![
            WordBox {
                word: "Wednesday".to_string(),
                x: 400,
                y: 50,
                width: 100,
                height: 20,
            },
            WordBox {
                word: "Thursday".to_string(),
                x: 600,
                y: 50,
                width: 100,
                height: 20,
            },
        ])
    }
}

/// Wednesday in ISO week 38.
fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 16).unwrap()
}

fn service(server: &MockServer, kua_path: &str, week: u32) -> MenuService {
    let client = reqwest::Client::new();
    let kua = KuaPipeline::new(
        client.clone(),
        KuaConfig {
            url: server.url(kua_path),
            ..KuaConfig::default()
        },
    );
    let itu = ItuPipeline::new(
        client,
        ItuConfig {
            candidates: vec![server.url("/canteen-menu")],
            ..ItuConfig::default()
        },
        StaticOcr { week },
    );
    let pipelines: Vec<Box<dyn MenuPipeline>> = vec![Box::new(kua), Box::new(itu)];
    MenuService::new(pipelines, 3)
}

fn mock_billboard(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET).path("/canteen-menu");
        then.status(200)
            .body(r#"<div class="canteen"><img src="/infoscreen/menu.png"></div>"#);
    });
    let png = encode_png(&DynamicImage::ImageRgb8(RgbImage::new(1000, 500))).unwrap();
    server.mock(|when, then| {
        when.method(GET).path("/infoscreen/menu.png");
        then.status(200).body(png);
    });
}

#[tokio::test]
async fn test_weekly_menus_from_both_sources() {
    let server = MockServer::start();
    let kua_mock = server.mock(|when, then| {
        when.method(GET).path("/sondre-campus/");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(KUA_PAGE);
    });
    mock_billboard(&server);

    let sources = service(&server, "/sondre-campus/", 38)
        .weekly_menus(today())
        .await;

    kua_mock.assert();
    let titles: Vec<&str> = sources.iter().map(|s| s.title.as_str()).collect();
    assert_eq!(titles, vec!["Kantinen", "FOLKEKØKKEN", "ITU"]);
    assert!(sources.iter().all(|s| s.days.len() == 5));
}

#[tokio::test]
async fn test_wednesday_query_skips_empty_days() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sondre-campus/");
        then.status(200).body(KUA_PAGE);
    });
    mock_billboard(&server);

    let entries = service(&server, "/sondre-campus/", 38)
        .menu_for_day(2, today())
        .await;

    // Kantinen has nothing on Wednesday.
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].title, "FOLKEKØKKEN");
    assert_eq!(entries[0].content, EntryContent::Text("Risotto.".to_string()));
    assert_eq!(entries[1].title, "ITU");
    assert!(matches!(entries[1].content, EntryContent::Image(_)));

    let monday = service(&server, "/sondre-campus/", 38)
        .menu_for_day(0, today())
        .await;
    assert_eq!(
        monday[0].content,
        EntryContent::Text("Fiskefrikadeller med remoulade. Rugbrød.".to_string())
    );
    // No "monday" anchor was detected, so ITU has no crop on Monday.
    assert!(monday.iter().all(|e| e.title != "ITU"));

    let friday = service(&server, "/sondre-campus/", 38)
        .menu_for_day(4, today())
        .await;
    assert_eq!(
        friday[0].content,
        EntryContent::Text("Fish and potatoes.".to_string())
    );
}

#[tokio::test]
async fn test_failures_degrade_to_fewer_results() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/sondre-campus/");
        then.status(500);
    });
    mock_billboard(&server);

    // KUA is down and the billboard still shows week 37.
    let entries = service(&server, "/sondre-campus/", 37)
        .menu_for_day(2, today())
        .await;

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title, "ITU");
    assert_eq!(entries[0].content, EntryContent::Unavailable);

    let message = render::compose(&entries);
    assert!(message.text.contains("No menu for this week is available yet."));
    assert!(message.attachments.is_empty());
}
