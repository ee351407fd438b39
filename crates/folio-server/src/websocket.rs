//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Path of the live-reload websocket.
pub const HMR_ROUTE: &str = "/__hmr";

/// Messages sent to clients for live reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Full page reload
    Reload,

    /// Replace the site stylesheet in place
    UpdateCss {
        /// Freshly compiled stylesheet
        css: String,
    },

    /// Connection established
    Connected,
}

/// Hub for broadcasting HMR messages to all connected clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    /// Create a new HMR hub.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // No receivers is fine
        let _ = self.sender.send(msg);
    }

    /// Subscribe to HMR messages.
    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate the client-side live-reload script.
///
/// The socket URL is derived from the page's own host, so the script works
/// behind any port the dev server was started on.
pub fn hmr_client_script() -> String {
    format!(
        r#"
(function() {{
  'use strict';

  const proto = location.protocol === 'https:' ? 'wss://' : 'ws://';
  const ws = new WebSocket(proto + location.host + '{}');
  let reconnectAttempts = 0;
  const maxReconnectAttempts = 10;

  function replaceStylesheet(css) {{
    let style = document.getElementById('folio-hmr-css');
    if (!style) {{
      style = document.createElement('style');
      style.id = 'folio-hmr-css';
      document.head.appendChild(style);
      document
        .querySelectorAll('link[rel="stylesheet"][href$="/assets/main.css"]')
        .forEach(function(link) {{ link.remove(); }});
    }}
    style.textContent = css;
  }}

  ws.onopen = function() {{
    console.log('[HMR] Connected');
    reconnectAttempts = 0;
  }};

  ws.onmessage = function(event) {{
    const msg = JSON.parse(event.data);
    console.log('[HMR]', msg.type);

    switch (msg.type) {{
      case 'reload':
        location.reload();
        break;

      case 'update_css':
        replaceStylesheet(msg.css);
        break;

      case 'connected':
        console.log('[HMR] Server acknowledged connection');
        break;
    }}
  }};

  ws.onclose = function() {{
    console.log('[HMR] Disconnected');
    if (reconnectAttempts < maxReconnectAttempts) {{
      reconnectAttempts++;
      setTimeout(function() {{
        console.log('[HMR] Reconnecting...');
        location.reload();
      }}, 1000 * reconnectAttempts);
    }}
  }};

  ws.onerror = function(e) {{
    console.error('[HMR] WebSocket error:', e);
  }};
}})();
"#,
        HMR_ROUTE
    )
}

/// Insert the live-reload script tag into an HTML page.
///
/// The tag goes before `</body>` when present, otherwise at the end.
pub fn inject_client(html: &str) -> String {
    let tag = "<script src=\"/__hmr.js\"></script>";
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}\n{}", &html[..pos], tag, &html[pos..]),
        None => format!("{}\n{}", html, tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = HmrHub::new();
        let mut rx = hub.subscribe();

        hub.send(HmrMessage::Reload);

        match rx.try_recv() {
            Ok(HmrMessage::Reload) => {}
            _ => panic!("Expected Reload message"),
        }
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn serializes_messages() {
        let msg = HmrMessage::UpdateCss {
            css: ".o-elk{}".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();

        assert_eq!(json, r#"{"type":"update_css","css":".o-elk{}"}"#);
    }

    #[test]
    fn client_script_targets_hmr_route() {
        let script = hmr_client_script();
        assert!(script.contains("location.host + '/__hmr'"));
        assert!(script.contains("update_css"));
    }

    #[test]
    fn injects_before_body_close() {
        let html = inject_client("<html><body><p>hi</p></body></html>");
        assert!(html.contains("<p>hi</p><script src=\"/__hmr.js\"></script>\n</body>"));

        let fragment = inject_client("<p>hi</p>");
        assert!(fragment.ends_with("<script src=\"/__hmr.js\"></script>"));
    }
}
