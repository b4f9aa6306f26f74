//! Build script -- writes the application icon and embeds the Windows
//! application manifest and icon resource.

#[path = "crates/drivesweep-gui/src/icon/raster.rs"]
mod raster;

const ICON_PATH: &str = "assets/icon.ico";

fn main() {
    println!("cargo:rerun-if-changed=crates/drivesweep-gui/src/icon/raster.rs");

    if !std::path::Path::new(ICON_PATH).exists() {
        if let Err(e) = std::fs::create_dir_all("assets") {
            println!("cargo:warning=Failed to create assets directory: {e}");
        }
        let data = raster::encode_ico(&[48, 32, 16]);
        if let Err(e) = std::fs::write(ICON_PATH, data) {
            println!("cargo:warning=Failed to write icon: {e}");
        }
    }

    // Only embed resources on Windows.
    if std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default() != "windows" {
        return;
    }

    let mut res = winresource::WindowsResource::new();
    res.set_manifest(
        r#"
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <assemblyIdentity type="win32" name="DriveSweep" version="0.1.0.0"/>
  <trustInfo xmlns="urn:schemas-microsoft-com:asm.v3">
    <security>
      <requestedPrivileges>
        <requestedExecutionLevel level="asInvoker" uiAccess="false"/>
      </requestedPrivileges>
    </security>
  </trustInfo>
  <compatibility xmlns="urn:schemas-microsoft-com:compatibility.v1">
    <application>
      <supportedOS Id="{8e0f7a12-bfb3-4fe8-b9a5-48fd50a15a9a}"/>
    </application>
  </compatibility>
  <application xmlns="urn:schemas-microsoft-com:asm.v3">
    <windowsSettings>
      <dpiAware xmlns="http://schemas.microsoft.com/SMI/2005/WindowsSettings">true/pm</dpiAware>
      <dpiAwareness xmlns="http://schemas.microsoft.com/SMI/2016/WindowsSettings">PerMonitorV2</dpiAwareness>
      <longPathAware xmlns="http://schemas.microsoft.com/SMI/2016/WindowsSettings">true</longPathAware>
    </windowsSettings>
  </application>
</assembly>
"#,
    );
    res.set("FileDescription", "DriveSweep drive cleanup");
    res.set("ProductName", "DriveSweep");

    if std::path::Path::new(ICON_PATH).exists() {
        res.set_icon(ICON_PATH);
    }

    if let Err(e) = res.compile() {
        println!("cargo:warning=Failed to compile Windows resources: {e}");
    }
}
