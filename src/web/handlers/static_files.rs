use axum::response::{Html, IntoResponse};

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>QrForge - QR Code Generator</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 480px;
            margin: 0 auto;
            padding: 20px;
            color: #333;
        }
        h1 { color: #2c3e50; text-align: center; }
        .card { border: 1px solid #ddd; border-radius: 8px; padding: 20px; }
        .tabs button.active { font-weight: bold; }
        label { display: block; margin-top: 12px; }
        input, select { width: 100%; padding: 8px; box-sizing: border-box; }
        .error { color: #c0392b; font-size: 0.9em; min-height: 1em; }
        .actions button { width: 100%; margin-top: 8px; padding: 10px; }
        #result { text-align: center; }
        .hidden { display: none; }
    </style>
</head>
<body>
    <h1>QrForge</h1>
    <div class="card">
        <form id="form">
            <div class="tabs">
                <button type="button" data-tab="url" class="active">URL</button>
                <button type="button" data-tab="wifi">WiFi</button>
            </div>
            <div id="url-fields">
                <label>Enter URL <input name="url" placeholder="https://example.com"></label>
                <div class="error" data-field="url"></div>
            </div>
            <div id="wifi-fields" class="hidden">
                <label>Network Name (SSID) <input name="ssid"></label>
                <div class="error" data-field="ssid"></div>
                <label>Security Type
                    <select name="security">
                        <option value="WPA">WPA/WPA2/WPA3</option>
                        <option value="WEP">WEP</option>
                        <option value="no password">No Password</option>
                    </select>
                </label>
                <div id="password-field">
                    <label>Password <input name="password" type="password"></label>
                    <div class="error" data-field="password"></div>
                </div>
            </div>
            <label>QR Code Color <input name="foreground" type="color" value="#000000"></label>
            <div class="error" data-field="foreground"></div>
            <label>Background Color <input name="background" type="color" value="#FFFFFF"></label>
            <div class="error" data-field="background"></div>
            <div class="actions"><button type="submit">Generate QR Code</button></div>
            <div class="error" id="form-error"></div>
        </form>
        <div id="result" class="hidden">
            <img id="qr" alt="QR code" width="250" height="250">
            <div class="actions">
                <button id="download">Download QR Code</button>
                <button id="copy">Copy to Clipboard</button>
                <button id="back">Create Another QR Code</button>
            </div>
            <div class="error" id="export-error"></div>
        </div>
    </div>
    <script>
        const form = document.getElementById('form');
        const result = document.getElementById('result');
        let kind = 'url';
        let png = null;
        let filename = null;
        let copiedTimer = null;

        function request() {
            const data = Object.fromEntries(new FormData(form));
            if (kind === 'url') {
                return { kind, url: data.url, foreground: data.foreground, background: data.background };
            }
            return { kind, ssid: data.ssid, password: data.password || '', security: data.security,
                     foreground: data.foreground, background: data.background };
        }

        function showErrors(errors) {
            document.getElementById('form-error').textContent = '';
            document.querySelectorAll('[data-field]').forEach(el => el.textContent = '');
            errors.forEach(e => {
                const el = document.querySelector(`[data-field="${e.field}"]`);
                if (el) el.textContent = e.message;
            });
        }

        document.querySelectorAll('.tabs button').forEach(button => {
            button.addEventListener('click', () => {
                kind = button.dataset.tab;
                form.reset();
                showErrors([]);
                document.querySelectorAll('.tabs button').forEach(b => b.classList.toggle('active', b === button));
                document.getElementById('url-fields').classList.toggle('hidden', kind !== 'url');
                document.getElementById('wifi-fields').classList.toggle('hidden', kind !== 'wifi');
            });
        });

        form.security.addEventListener('change', () => {
            document.getElementById('password-field').classList.toggle('hidden', form.security.value === 'no password');
        });

        form.querySelectorAll('input').forEach(input => {
            input.addEventListener('input', () => {
                const el = document.querySelector(`[data-field="${input.name}"]`);
                if (el) el.textContent = '';
            });
        });

        form.addEventListener('submit', async (e) => {
            e.preventDefault();
            const response = await fetch('/api/qr/png', {
                method: 'POST',
                headers: { 'Content-Type': 'application/json' },
                body: JSON.stringify(request()),
            });
            if (!response.ok) {
                const body = await response.json().catch(() => ({}));
                showErrors(body.errors || []);
                if (!body.errors) {
                    document.getElementById('form-error').textContent =
                        body.error || `Failed to generate QR code (${response.status})`;
                }
                return;
            }
            const disposition = response.headers.get('Content-Disposition') || '';
            filename = (disposition.match(/filename="([^"]+)"/) || [])[1] || 'qrcode.png';
            png = await response.blob();
            document.getElementById('qr').src = URL.createObjectURL(png);
            form.classList.add('hidden');
            result.classList.remove('hidden');
        });

        document.getElementById('download').addEventListener('click', () => {
            const link = document.createElement('a');
            link.href = URL.createObjectURL(png);
            link.download = filename;
            link.click();
        });

        document.getElementById('copy').addEventListener('click', async () => {
            const button = document.getElementById('copy');
            const errorEl = document.getElementById('export-error');
            try {
                await navigator.clipboard.write([new ClipboardItem({ 'image/png': png })]);
                errorEl.textContent = '';
                button.textContent = 'Copied!';
                clearTimeout(copiedTimer);
                copiedTimer = setTimeout(() => button.textContent = 'Copy to Clipboard', 2000);
            } catch (err) {
                errorEl.textContent = `Copy failed: ${err.message}`;
            }
        });

        document.getElementById('back').addEventListener('click', () => {
            png = null;
            form.reset();
            result.classList.add('hidden');
            form.classList.remove('hidden');
        });
    </script>
</body>
</html>"##;

// Serve the generator page for any non-API path
pub async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_index_page_served() {
        let response = serve_index().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(INDEX_HTML.contains("/api/qr/png"));
        assert!(INDEX_HTML.contains("2000"));
    }

    #[test]
    fn test_index_page_reports_non_field_errors() {
        assert!(INDEX_HTML.contains(r#"id="form-error""#));
        assert!(INDEX_HTML.contains("if (!response.ok)"));
        assert!(!INDEX_HTML.contains("field: kind"));
    }
}
