//! Captured B593 pages and fakes used by the tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::Path;
use axum::routing::post;
use axum::Router;

use crate::browser::{BrowserLauncher, BrowserSession};
use crate::error::CollectorError;

pub const STATUS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Status>
<SIG>21</SIG>
<Mode>30</Mode>
<Roam>0</Roam>
<SimStatus>1</SimStatus>
</Status>"#;

pub const HOME_PAGE: &str = r#"<html><head>
<script type="text/javascript">
var G_MonitoringStatus = {};
WanStatistics = {'uprate': '100', 'downrate': '200', 'upvolume': '300', 'downvolume': '400', 'liveTime': '500'};
</script></head>
<body><div id="main_content">Status</div></body></html>"#;

pub const LOGIN_PAGE: &str = r#"<html><body>
<input type="text" id="txt_Username"/>
<input type="password" id="txt_Password"/>
<input type="button" id="login_btn" value="Login"/>
</body></html>"#;

pub const MODEM_TABLE: &str = r#"
<table class="table_list" id="id_modemTable">
<tbody>
<tr class="even_tr"><th colspan="3" style="text-align: center;">Langattoman verkon tila</th></tr>
<tr class="module_content_center odd_tr" id="tritem_1"><td>1</td><td>PLMN:</td><td>24405</td></tr>
<tr class="module_content_center even_tr" id="tritem_2"><td>2</td><td>Palvelun tila:</td><td>Kelvollinen palvelu</td></tr>
<tr class="module_content_center odd_tr" id="tritem_3"><td>3</td>
<td>RSSI (dBm):</td><td>-48.0</td></tr>
<tr class="module_content_center even_tr" id="tritem_4"><td>4</td>
<td>RSRP (dBm):</td><td>-76.0</td></tr>
<tr class="module_content_center odd_tr" id="tritem_5"><td>5</td>
<td>RSRQ (dB):</td><td>-8.0</td></tr>
<tr class="module_content_center even_tr" id="tritem_6"><td>6</td><td>Verkkovierailu:</td><td>Ei</td></tr>
</tbody></table>
"#;

// ============================================================================
// Mock router HTTP endpoint and push gateway
// ============================================================================

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr.to_string()
}

/// Serve `body` from `/index/getStatusByAjax.cgi`, returning the `host:port`
pub async fn serve_status(body: impl Into<String>) -> String {
    let body: String = body.into();
    let app = Router::new().route(
        "/index/getStatusByAjax.cgi",
        post(move || {
            let body = body.clone();
            async move { body }
        }),
    );
    serve(app).await
}

/// Push gateway that records every request it receives
#[derive(Clone, Default)]
pub struct MockPushGateway {
    pub hits: Arc<AtomicUsize>,
    pub bodies: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockPushGateway {
    /// Start listening, returning the gateway base URL
    pub async fn start(&self) -> String {
        let hits = self.hits.clone();
        let bodies = self.bodies.clone();
        let app = Router::new().route(
            "/metrics/job/:job",
            post(
                move |Path(job): Path<String>, body: String| {
                    let hits = hits.clone();
                    let bodies = bodies.clone();
                    async move {
                        hits.fetch_add(1, Ordering::SeqCst);
                        bodies.lock().unwrap().push((job, body));
                        ""
                    }
                },
            ),
        );
        format!("http://{}", serve(app).await)
    }

    pub fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<(String, String)> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

// ============================================================================
// Scripted browser
// ============================================================================

/// How the fake router UI behaves
#[derive(Clone)]
pub struct FakeRouterUi {
    pub home_page: String,
    pub modem_table: String,
    /// Whether the modem rows ever render after clicking the radio button
    pub modem_renders: bool,
}

impl Default for FakeRouterUi {
    fn default() -> Self {
        Self {
            home_page: HOME_PAGE.to_string(),
            modem_table: MODEM_TABLE.to_string(),
            modem_renders: true,
        }
    }
}

/// Launcher handing out `FakeSession`s and logging every browser command
#[derive(Clone, Default)]
pub struct FakeLauncher {
    pub ui: FakeRouterUi,
    pub log: Arc<Mutex<Vec<String>>>,
}

impl FakeLauncher {
    pub fn new(ui: FakeRouterUi) -> Self {
        Self {
            ui,
            log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, CollectorError> {
        self.log.lock().unwrap().push("launch".to_string());
        Ok(Box::new(FakeSession {
            ui: self.ui.clone(),
            log: self.log.clone(),
            url: String::new(),
            logged_in: false,
            modem_shown: false,
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeSession {
    ui: FakeRouterUi,
    log: Arc<Mutex<Vec<String>>>,
    url: String,
    logged_in: bool,
    modem_shown: bool,
}

impl FakeSession {
    fn record(&self, entry: String) {
        self.log.lock().unwrap().push(entry);
    }

    fn on_diagnostics(&self) -> bool {
        self.url.ends_with("/html/management/diagnose.asp")
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<(), CollectorError> {
        self.record(format!("goto {}", url));
        self.url = url.to_string();
        self.modem_shown = false;
        Ok(())
    }

    async fn fill(&mut self, id: &str, value: &str) -> Result<(), CollectorError> {
        self.record(format!("fill {}={}", id, value));
        if self.logged_in || !LOGIN_PAGE.contains(id) {
            return Err(CollectorError::Extraction(format!("find #{}: element not found", id)));
        }
        Ok(())
    }

    async fn click(&mut self, id: &str) -> Result<(), CollectorError> {
        self.record(format!("click {}", id));
        match id {
            "login_btn" if !self.logged_in => self.logged_in = true,
            "id_modemRadio" if self.on_diagnostics() => self.modem_shown = true,
            _ => {
                return Err(CollectorError::Extraction(format!(
                    "click #{}: element not found",
                    id
                )))
            }
        }
        Ok(())
    }

    async fn wait_for(&mut self, id: &str, timeout: Duration) -> Result<(), CollectorError> {
        self.record(format!("wait {} {}s", id, timeout.as_secs()));
        if self.modem_shown && self.ui.modem_renders && self.ui.modem_table.contains(id) {
            Ok(())
        } else {
            Err(CollectorError::Timeout(format!(
                "#{} not present after {}s",
                id,
                timeout.as_secs_f64()
            )))
        }
    }

    async fn source(&mut self) -> Result<String, CollectorError> {
        self.record("source".to_string());
        let page = if self.on_diagnostics() {
            if self.modem_shown {
                self.ui.modem_table.clone()
            } else {
                "<html><body></body></html>".to_string()
            }
        } else if self.logged_in {
            self.ui.home_page.clone()
        } else {
            LOGIN_PAGE.to_string()
        };
        Ok(page)
    }

    async fn close(&mut self) -> Result<(), CollectorError> {
        self.record("close".to_string());
        Ok(())
    }
}
