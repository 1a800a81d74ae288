//! Deterministic project files around the generated components.

use std::collections::HashSet;

use serde::Serialize;

use siteforge_design::DesignBrief;
use siteforge_utils::GenerationError;
use siteforge_utils::types::{GeneratedFile, IntentManifest};

use crate::fallback::{component_name, component_path};

pub const APP_PATH: &str = "src/App.tsx";
pub const DESIGN_MANIFEST_PATH: &str = "design-manifest.json";

fn package_json(brand: &str) -> String {
    let name = brand
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-");
    format!(
        r#"{{
  "name": "{name}",
  "private": true,
  "version": "0.1.0",
  "type": "module",
  "scripts": {{
    "dev": "vite",
    "build": "tsc && vite build",
    "preview": "vite preview"
  }},
  "dependencies": {{
    "react": "^18.3.1",
    "react-dom": "^18.3.1"
  }},
  "devDependencies": {{
    "@types/react": "^18.3.3",
    "@types/react-dom": "^18.3.0",
    "@vitejs/plugin-react": "^4.3.1",
    "autoprefixer": "^10.4.19",
    "postcss": "^8.4.39",
    "tailwindcss": "^3.4.4",
    "typescript": "^5.5.3",
    "vite": "^5.3.3"
  }}
}}
"#
    )
}

fn google_fonts_href(brief: &DesignBrief) -> String {
    let weights = brief
        .fonts
        .weights
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(";");
    let family = |name: &str| format!("family={}:wght@{weights}", name.replace(' ', "+"));
    if brief.fonts.heading == brief.fonts.body {
        format!(
            "https://fonts.googleapis.com/css2?{}&display=swap",
            family(&brief.fonts.heading)
        )
    } else {
        format!(
            "https://fonts.googleapis.com/css2?{}&{}&display=swap",
            family(&brief.fonts.heading),
            family(&brief.fonts.body)
        )
    }
}

fn index_html(brand: &str, brief: &DesignBrief) -> String {
    let fonts = google_fonts_href(brief);
    format!(
        r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0" />
    <link rel="preconnect" href="https://fonts.googleapis.com" />
    <link href="{fonts}" rel="stylesheet" />
    <title>{brand}</title>
  </head>
  <body>
    <div id="root"></div>
    <script type="module" src="/src/main.tsx"></script>
  </body>
</html>
"#
    )
}

fn tailwind_config(brief: &DesignBrief) -> Result<String, GenerationError> {
    #[derive(Serialize)]
    struct Colors<'a> {
        primary: &'a siteforge_design::TintRamp,
        secondary: &'a siteforge_design::TintRamp,
        accent: &'a siteforge_design::TintRamp,
        neutral: &'a siteforge_design::TintRamp,
    }
    let colors = serde_json::to_string_pretty(&Colors {
        primary: &brief.palette.primary,
        secondary: &brief.palette.secondary,
        accent: &brief.palette.accent,
        neutral: &brief.palette.neutral,
    })
    .map_err(|e| GenerationError::Assembly {
        reason: format!("could not serialize palette: {e}"),
    })?;

    Ok(format!(
        r#"/** @type {{import('tailwindcss').Config}} */
export default {{
  content: ["./index.html", "./src/**/*.{{ts,tsx}}"],
  theme: {{
    extend: {{
      colors: {colors},
      fontFamily: {{
        heading: ["'{heading}'", "serif"],
        body: ["'{body}'", "sans-serif"],
      }},
    }},
  }},
  plugins: [],
}};
"#,
        heading = brief.fonts.heading,
        body = brief.fonts.body,
    ))
}

const MAIN_TSX: &str = r#"import React from "react";
import ReactDOM from "react-dom/client";
import App from "./App";
import "./index.css";

ReactDOM.createRoot(document.getElementById("root")!).render(
  <React.StrictMode>
    <App />
  </React.StrictMode>,
);
"#;

fn index_css(brief: &DesignBrief) -> String {
    format!(
        r#"@tailwind base;
@tailwind components;
@tailwind utilities;

:root {{
  --color-primary: {primary};
  --color-accent: {accent};
  --font-heading: '{heading}', serif;
  --font-body: '{body}', sans-serif;
}}

body {{
  font-family: var(--font-body);
}}

h1, h2, h3 {{
  font-family: var(--font-heading);
}}
"#,
        primary = brief.palette.primary.base(),
        accent = brief.palette.accent.base(),
        heading = brief.fonts.heading,
        body = brief.fonts.body,
    )
}

/// `package.json`, `index.html`, `tailwind.config.js`, `src/main.tsx`, `src/index.css`.
pub fn base_files(brand: &str, brief: &DesignBrief) -> Result<Vec<GeneratedFile>, GenerationError> {
    Ok(vec![
        GeneratedFile::new("package.json", package_json(brand)),
        GeneratedFile::new("index.html", index_html(brand, brief)),
        GeneratedFile::new("tailwind.config.js", tailwind_config(brief)?),
        GeneratedFile::new("src/main.tsx", MAIN_TSX),
        GeneratedFile::new("src/index.css", index_css(brief)),
    ])
}

/// `src/App.tsx` rendering every section component in order.
#[must_use]
pub fn app_file(sections: &[String]) -> GeneratedFile {
    let imports = sections
        .iter()
        .map(|s| format!("import {} from \"./components/{}\";", component_name(s), component_name(s)))
        .collect::<Vec<_>>()
        .join("\n");
    let body = sections
        .iter()
        .map(|s| format!("      <{} />", component_name(s)))
        .collect::<Vec<_>>()
        .join("\n");
    GeneratedFile::new(
        APP_PATH,
        format!(
            "{imports}\n\nexport default function App() {{\n  return (\n    <main>\n{body}\n    </main>\n  );\n}}\n"
        ),
    )
}

/// `design-manifest.json` carrying the manifest and the accepted brief.
pub fn design_manifest_file(
    manifest: &IntentManifest,
    brief: &DesignBrief,
) -> Result<GeneratedFile, GenerationError> {
    #[derive(Serialize)]
    struct DesignManifest<'a> {
        intent: &'a IntentManifest,
        design: &'a DesignBrief,
    }
    let content = serde_json::to_string_pretty(&DesignManifest {
        intent: manifest,
        design: brief,
    })
    .map_err(|e| GenerationError::Assembly {
        reason: format!("could not serialize design manifest: {e}"),
    })?;
    Ok(GeneratedFile::new(DESIGN_MANIFEST_PATH, content))
}

/// Reject file sets with empty or duplicate paths, or sections with no component.
pub fn validate_file_set(files: &[GeneratedFile], sections: &[String]) -> Result<(), GenerationError> {
    let mut seen = HashSet::new();
    for file in files {
        if file.path.trim().is_empty() {
            return Err(GenerationError::Assembly {
                reason: "generated file has an empty path".to_string(),
            });
        }
        if !seen.insert(file.path.as_str()) {
            return Err(GenerationError::Assembly {
                reason: format!("duplicate file path {}", file.path),
            });
        }
    }
    if let Some(missing) = sections
        .iter()
        .map(|s| component_path(s))
        .find(|path| !seen.contains(path.as_str()))
    {
        return Err(GenerationError::Assembly {
            reason: format!("App imports {missing}, which was not generated"),
        });
    }
    Ok(())
}
