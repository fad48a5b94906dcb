// src/providers/prompts.rs
use crate::models::{CodeFile, GenerateCodeOptions};

/// Characters of each source file forwarded for tech-stack detection.
pub const MAX_FILE_CHARS: usize = 2000;

pub fn image_comparison(framework: Option<&str>) -> String {
    let framework_hint = framework
        .map(|fw| {
            format!(
                "The project uses {} framework. Provide framework-specific code suggestions.",
                fw
            )
        })
        .unwrap_or_default();
    let framework_name = framework.unwrap_or("css");

    format!(
        r#"You are a UI/UX expert. Compare these two images: the first is the current UI, the second is the target design.

Analyze the differences and provide:
1. A list of specific differences (layout, colors, typography, spacing, components)
2. Code suggestions to transform the current UI to match the target
3. Priority level for each change (high, medium, low)
4. Estimated effort (quick, moderate, complex)

{framework_hint}

Return the response as a JSON object with this structure:
{{
  "differences": [
    {{
      "type": "color|spacing|typography|layout|component",
      "severity": "high|medium|low",
      "description": "detailed description",
      "currentValue": "current state",
      "targetValue": "target state",
      "coordinates": {{"x": 0, "y": 0, "width": 0, "height": 0}}
    }}
  ],
  "suggestions": [
    {{
      "type": "css|component|layout|styling",
      "description": "what to change",
      "code": "actual code snippet",
      "framework": "{framework_name}",
      "priority": "high|medium|low",
      "estimatedEffort": "quick|moderate|complex"
    }}
  ],
  "confidence": 0.85
}}"#
    )
}

pub fn tech_stack(files: &[CodeFile]) -> String {
    let code_analysis = files
        .iter()
        .map(|file| {
            let head: String = file.content.chars().take(MAX_FILE_CHARS).collect();
            format!("File: {}\n```\n{}\n```", file.filename, head)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        r#"Analyze these code files and detect the technology stack. Return a JSON object with:
{{
  "framework": "react|vue|angular|svelte|flutter|react-native|swift|kotlin",
  "language": "typescript|javascript|dart|swift|kotlin|java",
  "platform": "web|mobile|desktop",
  "confidence": 0.95,
  "autoDetected": true,
  "detectedFiles": [
    {{
      "filename": "file.tsx",
      "type": "react-component",
      "confidence": 0.9
    }}
  ],
  "reasoning": "Brief explanation of detection"
}}

Code files:
{code_analysis}"#
    )
}

pub fn code_generation(options: &GenerateCodeOptions) -> String {
    let framework = &options.framework;
    let mut context = format!("Description: {}\n", options.description);
    if let Some(target) = &options.target_element {
        context.push_str(&format!("Target Element: {}\n", target));
    }
    if let Some(differences) = &options.differences {
        let serialized =
            serde_json::to_string_pretty(differences).unwrap_or_else(|_| "[]".to_string());
        context.push_str(&format!("\nDifferences to address:\n{}\n", serialized));
    }

    format!(
        r#"Generate {framework} code to implement the following changes:

{context}
Provide practical, working code that can be directly implemented. Include:
1. Component code (if applicable)
2. Styling (CSS/styled-components/etc.)
3. Any necessary imports or dependencies
4. Brief implementation notes

Return as JSON:
{{
  "framework": "{framework}",
  "suggestions": [
    {{
      "file": "component/file/path",
      "code": "actual code here",
      "description": "what this code does",
      "type": "component|style|config"
    }}
  ],
  "dependencies": ["any new dependencies needed"],
  "notes": "implementation guidance"
}}"#
    )
}
