//! Command-line flags for `glcube`.

/// What the command line asked for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchOptions {
    pub backends: wgpu::Backends,
    pub show_fps: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            backends: wgpu::Backends::GL,
            show_fps: false,
        }
    }
}

/// Accepts `--gpu-backend=gl|auto|vulkan|dx12|metal` and
/// `--show-fps[=on|off]`. Anything else is ignored.
pub fn parse_args<I, S>(args: I) -> LaunchOptions
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut opts = LaunchOptions::default();
    for arg in args {
        let arg = arg.as_ref();
        if let Some(val) = arg.strip_prefix("--gpu-backend=") {
            opts.backends = parse_backend(val).unwrap_or_else(|| {
                log::warn!("Unknown backend '{val}', falling back to gl.");
                wgpu::Backends::GL
            });
        } else if arg == "--show-fps" {
            opts.show_fps = true;
        } else if let Some(val) = arg.strip_prefix("--show-fps=") {
            opts.show_fps = matches!(
                val.to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            );
        }
    }
    opts
}

fn parse_backend(val: &str) -> Option<wgpu::Backends> {
    let backends = match val.to_ascii_lowercase().as_str() {
        "gl" | "opengl" | "gles" => wgpu::Backends::GL,
        "auto" => wgpu::Backends::all(),
        "vulkan" | "vk" => wgpu::Backends::VULKAN,
        "dx12" | "d3d12" => wgpu::Backends::DX12,
        "metal" | "mtl" => wgpu::Backends::METAL,
        _ => return None,
    };
    Some(backends)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_means_opengl_without_fps() {
        assert_eq!(parse_args(Vec::<String>::new()), LaunchOptions::default());
    }

    #[test]
    fn backend_flag_is_case_insensitive() {
        assert_eq!(
            parse_args(["--gpu-backend=Vulkan"]).backends,
            wgpu::Backends::VULKAN
        );
        assert_eq!(parse_args(["--gpu-backend=auto"]).backends, wgpu::Backends::all());
    }

    #[test]
    fn unknown_backend_falls_back_to_gl() {
        assert_eq!(parse_args(["--gpu-backend=glide"]).backends, wgpu::Backends::GL);
    }

    #[test]
    fn show_fps_variants() {
        assert!(parse_args(["--show-fps"]).show_fps);
        assert!(parse_args(["--show-fps=on"]).show_fps);
        assert!(!parse_args(["--show-fps=off"]).show_fps);
        assert!(!parse_args(["--show-fps", "--show-fps=0"]).show_fps);
    }
}
