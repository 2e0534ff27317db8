use crate::models::ClientRecord;

/// Renders the full status page for one client. Every sheet-sourced value is
/// escaped before it reaches the markup.
pub fn render_status(record: &ClientRecord) -> String {
    let mut content = String::new();

    content.push_str(&format!(
        r#"<div class="block block-1">
  <div class="bike-emoji">🚲</div>
  <div class="client-info">
    <h2>{name}</h2>
    <div class="details">
      <div class="detail-item"><span class="label">Велосипед:</span> <span class="value">{bike}</span></div>
      <div class="detail-item"><span class="label">Тариф:</span> <span class="value">{tariff} zł/неделю</span></div>
    </div>
  </div>
</div>
"#,
        name = escape_html(&record.name),
        bike = escape_html(&record.bike),
        tariff = escape_html(&record.tariff),
    ));

    let overdue_class = if record.overdue() { " overdue" } else { "" };
    content.push_str(&format!(
        "<div class=\"block block-2{overdue_class}\">\n  <div class=\"payment-info\">\n"
    ));
    if let (Some(amount), Some(date)) = (&record.last_payment_amount, &record.last_payment_date) {
        content.push_str(&format!(
            r#"    <div class="payment-item"><span class="label">Последний платеж:</span> <span class="value">{}zł - {}</span></div>
"#,
            escape_html(amount),
            escape_html(date),
        ));
    }
    if let Some(next) = &record.next_payment_date {
        content.push_str(&format!(
            r#"    <div class="payment-item"><span class="label">Следующий платеж:</span> <span class="value">{}</span></div>
"#,
            escape_html(next),
        ));
    }
    if record.overdue() {
        content.push_str(&format!(
            "    <div class=\"debt\">Задолженность: {}zł</div>\n",
            format_debt(record.debt),
        ));
    }
    content.push_str("  </div>\n</div>\n");

    let comment = record.comment.trim();
    if !comment.is_empty() {
        content.push_str(&format!(
            r#"<div class="block block-3">
  <div class="message">
    <h3>Сообщение от BikeRent</h3>
    <div class="message-content">{}</div>
  </div>
</div>
"#,
            escape_html(comment),
        ));
    }

    PAGE_SHELL.replace("{{CONTENT}}", &content)
}

/// Full-page error panel with a manual retry control.
pub fn render_error(message: &str) -> String {
    let panel = format!(
        r#"<div class="block error-panel">
  <h3>Ошибка</h3>
  <p>{}</p>
  <button onclick="location.reload()">Обновить страницу</button>
</div>
"#,
        escape_html(message),
    );
    PAGE_SHELL.replace("{{CONTENT}}", &panel)
}

fn format_debt(debt: f64) -> String {
    if debt.fract() == 0.0 {
        format!("{debt:.0}")
    } else {
        debt.to_string()
    }
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// The meta refresh re-runs the whole fetch cycle every 10 minutes; whichever
// load finishes last owns the display.
const PAGE_SHELL: &str = r#"<!DOCTYPE html>
<html lang="ru">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <meta http-equiv="refresh" content="600" />
  <title>BikeRent — статус аренды</title>
  <style>
    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, #667eea, #764ba2);
      color: #2b2a28;
      font-family: "Segoe UI", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(560px, 100%);
      display: grid;
      gap: 20px;
    }

    header h1 {
      margin: 0;
      color: white;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
      text-align: center;
    }

    .block {
      background: rgba(255, 255, 255, 0.94);
      border-radius: 18px;
      box-shadow: 0 18px 40px rgba(31, 27, 76, 0.25);
      padding: 24px;
    }

    .block-1 {
      display: flex;
      align-items: center;
      gap: 18px;
    }

    .bike-emoji {
      font-size: 3rem;
    }

    .client-info h2 {
      margin: 0 0 8px;
    }

    .detail-item,
    .payment-item {
      display: flex;
      justify-content: space-between;
      gap: 12px;
      padding: 4px 0;
    }

    .label {
      color: #6b645d;
    }

    .value {
      font-weight: 600;
    }

    .block-2.overdue {
      background: #fdecea;
      border: 1px solid #f5c6cb;
    }

    .debt {
      margin-top: 12px;
      padding: 10px 14px;
      border-radius: 10px;
      background: #dc3545;
      color: white;
      font-weight: 600;
      text-align: center;
    }

    .message h3 {
      margin: 0 0 10px;
    }

    .message-content {
      color: #4a463f;
      line-height: 1.5;
    }

    .error-panel {
      background: #f8d7da;
      color: #721c24;
      text-align: center;
      padding: 40px 24px;
    }

    .error-panel h3 {
      margin: 0 0 16px;
      color: #721c24;
    }

    .error-panel button {
      margin-top: 20px;
      padding: 10px 30px;
      background: #dc3545;
      color: white;
      border: none;
      border-radius: 8px;
      cursor: pointer;
      font-size: 16px;
    }
  </style>
</head>
<body>
  <div class="app">
    <header>
      <h1>BikeRent</h1>
    </header>
{{CONTENT}}
  </div>
</body>
</html>
"#;
