//! Stylesheet served at `/static/style.css`.

pub const STYLESHEET: &str = r#"
:root { --sg-red: #d32f2f; --muted: #666; --border: #e0e0e0; }
* { box-sizing: border-box; }
body { margin: 0; font-family: system-ui, -apple-system, "Segoe UI", sans-serif; color: #222; background: #fff; }
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 22rem; flex-shrink: 0; padding: 1.5rem; background: #f0f2f6; border-right: 1px solid var(--border); }
.content { flex: 1; padding: 2rem 3rem; max-width: 60rem; }
.sidebar h2 { font-size: 1.1rem; }
hr { border: 0; border-top: 1px solid var(--border); margin: 1.5rem 0; }
.main-header { text-align: center; color: var(--sg-red); margin-bottom: 0.5rem; }
.subtitle { text-align: center; font-size: 1.2rem; color: var(--muted); margin-bottom: 2rem; }
.notice { padding: 0.75rem 1rem; border-radius: 5px; margin: 0.5rem 0; white-space: pre-wrap; }
.notice-success { background: #e8f5e9; color: #1b5e20; }
.notice-info { background: #e3f2fd; color: #0d47a1; }
.notice-warning { background: #fff8e1; color: #8a6d00; }
.notice-error { background: #ffebee; color: #b71c1c; }
.recommendation-box { background: #f8f9fa; border-left: 5px solid var(--sg-red); padding: 1rem; margin: 0.5rem 0; border-radius: 0 5px 5px 0; }
.alternative-box { background: #e8f5e8; border: 1px solid #4caf50; padding: 1rem; border-radius: 5px; margin: 0.5rem 0; }
.nutrition-metric { display: inline-block; background: #e3f2fd; padding: 0.75rem 1rem; border-radius: 5px; text-align: center; margin: 0.25rem; }
.nutrition-metric strong { display: block; font-size: 1.3rem; }
.prewrap { white-space: pre-wrap; }
form.stack label, form label.block { display: block; margin: 0.75rem 0 0.25rem; font-weight: 600; }
input[type=text], input[type=password], select, textarea { width: 100%; padding: 0.5rem; border: 1px solid var(--border); border-radius: 5px; font: inherit; }
button { margin-top: 0.75rem; padding: 0.5rem 1rem; border: 1px solid var(--sg-red); border-radius: 5px; background: #fff; color: var(--sg-red); font: inherit; cursor: pointer; }
button.primary { background: var(--sg-red); color: #fff; width: 100%; }
button.secondary { border-color: var(--border); color: #444; }
.row { display: flex; gap: 0.5rem; flex-wrap: wrap; }
.columns { display: grid; grid-template-columns: 1fr 1fr; gap: 1.5rem; }
fieldset { border: 1px solid var(--border); border-radius: 5px; margin: 0.75rem 0; }
label.check { display: inline-block; margin: 0.2rem 1rem 0.2rem 0; font-weight: normal; }
.mode-switch { display: flex; gap: 1rem; margin: 1rem 0; }
.mode-switch a { padding: 0.4rem 0.9rem; border: 1px solid var(--border); border-radius: 20px; text-decoration: none; color: #444; }
.mode-switch a.active { border-color: var(--sg-red); color: var(--sg-red); font-weight: 600; }
.tabs { margin-top: 1rem; }
.tabs > input[type=radio] { display: none; }
.tabs > label { display: inline-block; padding: 0.5rem 1rem; border-bottom: 2px solid transparent; cursor: pointer; }
.tabs > input:checked + label { border-bottom-color: var(--sg-red); color: var(--sg-red); }
.tab-panel { display: none; padding-top: 1rem; }
#tab-rec:checked ~ #panel-rec, #tab-nut:checked ~ #panel-nut, #tab-sg:checked ~ #panel-sg, #tab-alt:checked ~ #panel-alt { display: block; }
pre.json { background: #272822; color: #f8f8f2; padding: 1rem; border-radius: 5px; overflow-x: auto; font-size: 0.8rem; }
details summary { cursor: pointer; font-weight: 600; }
.processing { display: flex; align-items: center; gap: 0.75rem; }
.spinner { width: 2.5rem; height: 2.5rem; border: 4px solid #f3f3f3; border-top-color: var(--sg-red); border-radius: 50%; animation: spin 1s linear infinite; }
.spinner.inline { width: 1.2rem; height: 1.2rem; border-width: 3px; }
.loading-overlay { display: none; position: fixed; inset: 0; background: rgba(255, 255, 255, 0.8); align-items: center; justify-content: center; flex-direction: column; z-index: 10; }
.loading-overlay.visible { display: flex; }
@keyframes spin { to { transform: rotate(360deg); } }
"#;
