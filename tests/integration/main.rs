mod extension_registry;
mod workspace_paths;
