//! Script compiler: parameters in, ordered command script out.
//!
//! Compilation is pure given its inputs: it expands macros, resolves
//! paths against the build working directory, validates the requested
//! build configuration against the project metadata and emits commands
//! in the fixed order the tool expects.

use std::path::{Path, PathBuf};

use advkit_core::script::commands;
use advkit_core::{
    AdvkitError, AdvkitResult, BuildParameters, CommandScript, EnvVars, ResolvedBuildContext,
};

use crate::aip::AipReader;

/// Expand macros and resolve paths, producing the resolved context the
/// compiler and executor work from. An output folder that is empty after
/// expansion resolves to unset, not an empty path.
pub fn resolve(
    params: &BuildParameters,
    env: &EnvVars,
    workspace: &Path,
) -> AdvkitResult<ResolvedBuildContext> {
    let aip_raw = env.expand(&params.aip_path);
    if aip_raw.is_empty() {
        return Err(AdvkitError::Configuration(
            "a project file path is required".to_string(),
        ));
    }

    let output_folder_raw = env.expand(&params.output_folder);
    let output_folder = if output_folder_raw.is_empty() {
        None
    } else {
        Some(absolutize(workspace, &output_folder_raw))
    };

    let extra_commands = env
        .expand(&params.extra_commands)
        .split(['\r', '\n'])
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect();

    Ok(ResolvedBuildContext {
        aip_path: absolutize(workspace, &aip_raw),
        build_name: env.expand(&params.build_name),
        output_folder,
        output_name: env.expand(&params.output_name),
        skip_digital_signature: params.skip_digital_signature,
        extra_commands,
        env: env.clone(),
    })
}

/// Compile the resolved context into the ordered command script.
///
/// Order is significant: package-name, output-location, signature reset,
/// user extra commands in their original order, and always a final
/// `Build`. An empty build name is a valid signal to the tool meaning
/// "all configurations".
pub fn compile(ctx: &ResolvedBuildContext, project: &AipReader) -> AdvkitResult<CommandScript> {
    if !ctx.build_name.is_empty() && !project.has_build(&ctx.build_name) {
        return Err(AdvkitError::BuildConfigurationNotFound(
            ctx.build_name.clone(),
        ));
    }

    let mut script = CommandScript::new();

    // These commands address a specific build, so they need a build name
    if !ctx.build_name.is_empty() {
        if !ctx.output_name.is_empty() {
            script.push(commands::set_package_name(&ctx.output_name, &ctx.build_name));
        }
        if let Some(folder) = &ctx.output_folder {
            script.push(commands::set_output_location(&ctx.build_name, folder));
        }
    }

    if ctx.skip_digital_signature {
        script.push(commands::reset_sig());
    }

    // Passed through without validation; the tool vets its own syntax
    for line in &ctx.extra_commands {
        script.push(line.clone());
    }

    script.push(commands::build(&ctx.build_name));
    Ok(script)
}

fn absolutize(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
