use crate::models::OverviewResponse;
use crate::score::{ColorToken, MAX_SCORE, color_for_score};
use crate::stats::{DayView, YearView};

const SQUARE_PITCH: usize = 15;
const SELECTABLE_YEARS: i32 = 5;

pub fn render_index(view: &YearView, overview: &OverviewResponse, current_year: i32) -> String {
    INDEX_HTML
        .replace("{{YEAR}}", &view.year.to_string())
        .replace("{{YEAR_OPTIONS}}", &render_year_options(view.year, current_year))
        .replace("{{ACTIVITY_COUNT}}", &view.activity_count.to_string())
        .replace("{{MONTH_LABELS}}", &render_month_labels(view))
        .replace("{{GRID}}", &render_grid(view))
        .replace("{{LEGEND}}", &render_legend())
        .replace("{{OVERVIEW}}", &render_overview(overview))
}

fn render_year_options(selected: i32, current_year: i32) -> String {
    let mut years: Vec<i32> = (0..SELECTABLE_YEARS).map(|back| current_year - back).collect();
    if !years.contains(&selected) {
        years.push(selected);
        years.sort_unstable_by(|a, b| b.cmp(a));
    }

    let mut html = String::new();
    for year in years {
        let marker = if year == selected { " selected" } else { "" };
        html.push_str(&format!(r#"<option value="{year}"{marker}>{year}</option>"#));
    }
    html
}

fn render_month_labels(view: &YearView) -> String {
    let mut html = String::new();
    for label in &view.month_labels {
        html.push_str(&format!(
            r#"<span class="month" style="left:{}px">{}</span>"#,
            label.week_index * SQUARE_PITCH,
            label.label
        ));
    }
    html
}

fn render_grid(view: &YearView) -> String {
    let mut html = String::new();
    for week in &view.weeks {
        html.push_str(r#"<div class="week">"#);
        for day in &week.days {
            render_day(&mut html, day);
        }
        html.push_str("</div>");
    }
    html
}

fn render_day(html: &mut String, day: &DayView) {
    if !day.is_in_year {
        html.push_str(r#"<span class="day padding"></span>"#);
        return;
    }
    let training = day.training_type.map_or("", |training| training.as_str());
    let diet = day.diet.map_or("", |diet| diet.as_str());
    html.push_str(&format!(
        r#"<button type="button" class="day" style="background:{color}" title="{date} (score {score})" data-date="{date}" data-training="{training}" data-diet="{diet}"></button>"#,
        color = day.color.css(),
        date = day.date,
        score = day.score,
    ));
}

fn render_legend() -> String {
    let mut html = String::new();
    for score in 0..=MAX_SCORE {
        let token: ColorToken = color_for_score(score);
        html.push_str(&format!(
            r#"<span class="day" style="background:{}" title="Activity level {score}"></span>"#,
            token.css()
        ));
    }
    html
}

fn render_overview(overview: &OverviewResponse) -> String {
    let rows = [
        ("physical", "Physical", overview.percentages.physical),
        ("cardio", "Cardio", overview.percentages.cardio),
        ("diet", "Good Diet", overview.percentages.good_diet),
        ("rest", "Rest Days", overview.percentages.rest_days),
    ];
    let mut html = String::new();
    for (class, label, percent) in rows {
        html.push_str(&format!(
            r#"<div class="stat"><span class="bar bar-{class}" style="width:{percent}%"></span><span class="label">{label}</span><span class="value">{percent}%</span></div>"#
        ));
    }
    html
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>FitMe</title>
  <style>
    :root {
      --bg: #faf7f2;
      --ink: #2b2a28;
      --muted: #8b857d;
      --card: #ffffff;
      --square-empty: #ebe6de;
    }

    [data-theme="dark"] {
      --bg: #1f1d1b;
      --ink: #f1ece4;
      --muted: #a39d94;
      --card: #2a2725;
      --square-empty: #3a3633;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(920px, 100%);
      background: var(--card);
      border-radius: 20px;
      padding: 32px;
      display: grid;
      gap: 24px;
    }

    header { display: flex; justify-content: space-between; align-items: center; }
    h1 { margin: 0; }
    .subtitle, .hint { margin: 0; color: var(--muted); }
    .controls { display: flex; justify-content: space-between; align-items: center; }

    .grid-wrap { overflow-x: auto; }
    .months { position: relative; height: 18px; font-size: 11px; color: var(--muted); }
    .month { position: absolute; top: 0; }
    .grid { display: flex; gap: 3px; }
    .week { display: grid; grid-template-rows: repeat(7, 12px); gap: 3px; }

    .day {
      width: 12px;
      height: 12px;
      border: none;
      border-radius: 3px;
      padding: 0;
      cursor: pointer;
    }

    .day.padding { background: transparent; cursor: default; }
    .legend { display: flex; gap: 4px; align-items: center; font-size: 12px; color: var(--muted); }

    .overview { display: grid; gap: 8px; }
    .stat { display: grid; grid-template-columns: 1fr 110px 48px; align-items: center; gap: 10px; }
    .bar { height: 8px; border-radius: 4px; }
    .bar-physical { background: #D97757; }
    .bar-cardio { background: #7D8B7E; }
    .bar-diet { background: #E8B87D; }
    .bar-rest { background: var(--muted); }

    .status { min-height: 1.2em; }
    .status[data-type="error"] { color: #c63b2b; }
    .status[data-type="ok"] { color: #2d7a4b; }

    dialog { border: none; border-radius: 16px; padding: 24px; }
    dialog form { display: grid; gap: 12px; }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>FitMe</h1>
        <p class="subtitle">Track your fitness journey</p>
      </div>
      <button type="button" id="theme-toggle" aria-label="Toggle theme">&#9789;</button>
    </header>

    <section class="controls">
      <span>{{ACTIVITY_COUNT}} activities in {{YEAR}}</span>
      <select id="year" aria-label="Year">{{YEAR_OPTIONS}}</select>
    </section>

    <section class="grid-wrap">
      <div class="months">{{MONTH_LABELS}}</div>
      <div class="grid" id="grid">{{GRID}}</div>
    </section>

    <div class="legend"><span>Less</span>{{LEGEND}}<span>More</span></div>

    <section class="overview">
      <h3>Activity overview</h3>
      {{OVERVIEW}}
    </section>

    <div class="status" id="status"></div>
    <p class="hint">Physical training +2, cardio +1, good diet +1. Click a day to log it.</p>
  </main>

  <dialog id="editor">
    <form method="dialog">
      <strong id="editor-date"></strong>
      <label>Training
        <select id="editor-training">
          <option value="none">None</option>
          <option value="cardio">Cardio</option>
          <option value="physical">Physical</option>
        </select>
      </label>
      <label>Diet
        <select id="editor-diet">
          <option value="">Not logged</option>
          <option value="good">Good</option>
          <option value="bad">Bad</option>
        </select>
      </label>
      <div>
        <button type="button" id="editor-save">Save</button>
        <button type="button" id="editor-clear">Clear</button>
        <button value="cancel">Cancel</button>
      </div>
    </form>
  </dialog>

  <script>
    const statusEl = document.getElementById('status');
    const editor = document.getElementById('editor');
    const editorDate = document.getElementById('editor-date');
    const editorTraining = document.getElementById('editor-training');
    const editorDiet = document.getElementById('editor-diet');
    let selectedDate = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const applyTheme = (dark) => {
      document.documentElement.setAttribute('data-theme', dark ? 'dark' : 'light');
      localStorage.setItem('fitme-dark-mode', JSON.stringify(dark));
    };
    applyTheme(JSON.parse(localStorage.getItem('fitme-dark-mode') || 'false'));
    document.getElementById('theme-toggle').addEventListener('click', () => {
      applyTheme(document.documentElement.getAttribute('data-theme') !== 'dark');
    });

    document.getElementById('year').addEventListener('change', (event) => {
      window.location.search = `?year=${event.target.value}`;
    });

    document.querySelectorAll('#grid button.day').forEach((square) => {
      square.addEventListener('click', () => {
        selectedDate = square.dataset.date;
        editorDate.textContent = selectedDate;
        editorTraining.value = square.dataset.training || 'none';
        editorDiet.value = square.dataset.diet || '';
        editor.showModal();
      });
    });

    const send = async (method, body) => {
      const res = await fetch(`/api/activities/${selectedDate}`, {
        method,
        headers: { 'content-type': 'application/json' },
        body: body ? JSON.stringify(body) : undefined
      });
      if (!res.ok) {
        const payload = await res.json().catch(() => ({}));
        throw new Error(payload.error || 'Request failed');
      }
      window.location.reload();
    };

    document.getElementById('editor-save').addEventListener('click', () => {
      const diet = editorDiet.value || null;
      send('PUT', { trainingType: editorTraining.value, diet })
        .catch((err) => setStatus(err.message, 'error'));
      editor.close();
    });

    document.getElementById('editor-clear').addEventListener('click', () => {
      const hasRecord = document.querySelector(`#grid [data-date="${selectedDate}"]`).dataset.training;
      editor.close();
      if (!hasRecord) {
        return;
      }
      send('DELETE').catch((err) => setStatus(err.message, 'error'));
    });
  </script>
</body>
</html>
"#;
