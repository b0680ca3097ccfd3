use std::fmt;

/// Pipeline stage a shader object belongs to.
///
/// Displays as `VERTEX` / `FRAGMENT`, the tags carried by compile
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("VERTEX"),
            ShaderStage::Fragment => f.write_str("FRAGMENT"),
        }
    }
}

/// Failures that abort render-session startup.
///
/// Every variant is fatal: the caller reports it once and never schedules
/// the frame loop. The steady-state frame path has no error returns.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create {kind}: {detail}")]
    CreateResource { kind: &'static str, detail: String },
    #[error("error compiling the {stage} shader: {log}")]
    CompileShader { stage: ShaderStage, log: String },
    #[error("error linking the shader program: {log}")]
    LinkProgram { log: String },
    #[error("vertex attribute '{name}' missing from the linked program")]
    MissingAttribute { name: &'static str },
    #[error("uniform '{name}' missing from the linked program")]
    MissingUniform { name: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_tags_match_diagnostic_convention() {
        assert_eq!(ShaderStage::Vertex.to_string(), "VERTEX");
        assert_eq!(ShaderStage::Fragment.to_string(), "FRAGMENT");
    }

    #[test]
    fn compile_error_carries_stage_and_log() {
        let err = RenderError::CompileShader {
            stage: ShaderStage::Fragment,
            log: "0:3: 'foo' : undeclared identifier".into(),
        };
        let message = err.to_string();
        assert!(message.contains("FRAGMENT"));
        assert!(message.contains("undeclared identifier"));
    }
}
