#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("bevel_cli error: {err}");
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use corner_bevel::geom::{
        BevelDiagnostics, BevelMesh, BevelRequest, BevelResult, bevel_face, solve_with_diagnostics,
    };
    use corner_bevel::settings::{BevelSettings, parse_point};
    use std::fmt::Write as _;
    use std::fs::{self, File};
    use std::io::{BufWriter, Write};
    use std::path::{Path, PathBuf};

    pub(crate) const SNAPSHOT_QUANTIZE: f64 = 1e-6;
    const SNAPSHOT_DECIMALS: usize = 6;

    const USAGE: &str = r#"bevel_cli (corner-bevel)

USAGE:
  bevel_cli list
  bevel_cli run <scenario|all> [options]
  bevel_cli solve --anchor x,y,z --side-b x,y,z --side-c x,y,z [--offset f] [--segments n] [options]

SCENARIOS:
  right_corner
  skewed_corner
  obtuse_corner
  flipped_normal
  tilted_plane
  collinear

OPTIONS:
  --out-dir <dir>    Write <scenario>.obj and/or <scenario>.snap to this dir (required for `run all`)
  --obj <path>       Write the bevel face as OBJ (single corner only)
  --snap <path>      Write the snapshot to a file instead of stdout (single corner only)
  --overwrite        Overwrite existing output files
  -h, --help         Show this help

Offsets are clamped to the shortest side and segments to 1..=16, as in the editor.
"#;

    pub fn run() -> Result<(), String> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut args = Args::new(args);

        let Some(command) = args.next() else {
            print_usage();
            return Ok(());
        };

        match command.as_str() {
            "list" => {
                print_scenarios();
                Ok(())
            }
            "run" => cmd_run(&mut args),
            "solve" => cmd_solve(&mut args),
            "-h" | "--help" | "help" => {
                print_usage();
                Ok(())
            }
            other => Err(format!("unknown command `{other}`\n\n{USAGE}")),
        }
    }

    fn print_usage() {
        println!("{USAGE}");
    }

    fn print_scenarios() {
        for scenario in Scenario::ALL {
            println!("{}", scenario.name());
        }
    }

    #[derive(Debug, Default)]
    struct OutputOptions {
        out_dir: Option<PathBuf>,
        obj_path: Option<PathBuf>,
        snap_path: Option<PathBuf>,
        overwrite: bool,
    }

    impl OutputOptions {
        /// Consume a shared output flag; returns `Ok(false)` if `arg` is not one.
        fn accept(&mut self, arg: &str, args: &mut Args) -> Result<bool, String> {
            match arg {
                "--out-dir" => self.out_dir = Some(PathBuf::from(args.value("--out-dir")?)),
                "--obj" => self.obj_path = Some(PathBuf::from(args.value("--obj")?)),
                "--snap" => self.snap_path = Some(PathBuf::from(args.value("--snap")?)),
                "--overwrite" => self.overwrite = true,
                _ => return Ok(false),
            }
            Ok(true)
        }
    }

    fn cmd_run(args: &mut Args) -> Result<(), String> {
        let scenario_name = args.next().ok_or("missing scenario name")?;

        let mut output = OutputOptions::default();
        while let Some(arg) = args.next() {
            if output.accept(&arg, args)? {
                continue;
            }
            match arg.as_str() {
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        if scenario_name == "all" {
            let dir = output
                .out_dir
                .as_deref()
                .ok_or("`run all` requires --out-dir")?;
            for scenario in Scenario::ALL {
                let corner = solve_corner(scenario.name(), &scenario.settings())?;
                write_to_dir(&corner, dir, output.overwrite)?;
            }
            return Ok(());
        }

        let scenario = Scenario::from_str(scenario_name.as_str())
            .ok_or_else(|| unknown_scenario(&scenario_name))?;
        let corner = solve_corner(scenario.name(), &scenario.settings())?;
        emit(&corner, &output)
    }

    fn cmd_solve(args: &mut Args) -> Result<(), String> {
        let mut settings = BevelSettings::default();
        let mut output = OutputOptions::default();

        while let Some(arg) = args.next() {
            if output.accept(&arg, args)? {
                continue;
            }
            match arg.as_str() {
                "--anchor" => settings.anchor = point_arg(args, "--anchor")?,
                "--side-b" => settings.side_b = point_arg(args, "--side-b")?,
                "--side-c" => settings.side_c = point_arg(args, "--side-c")?,
                "--offset" => {
                    let raw = args.value("--offset")?;
                    settings.offset = raw
                        .parse()
                        .map_err(|_| format!("invalid --offset `{raw}`"))?;
                }
                "--segments" => {
                    let raw = args.value("--segments")?;
                    settings.segments = raw
                        .parse()
                        .map_err(|_| format!("invalid --segments `{raw}`"))?;
                }
                "-h" | "--help" => {
                    print_usage();
                    return Ok(());
                }
                other => return Err(format!("unknown option `{other}`\n\n{USAGE}")),
            }
        }

        let corner = solve_corner("solve", &settings)?;
        emit(&corner, &output)
    }

    fn point_arg(args: &mut Args, flag: &str) -> Result<[f64; 3], String> {
        let raw = args.value(flag)?;
        parse_point(&raw)
            .map(|p| p.to_array())
            .map_err(|e| format!("{flag}: {e}"))
    }

    struct SolvedCorner {
        name: String,
        request: BevelRequest,
        result: BevelResult,
        diag: BevelDiagnostics,
        mesh: Option<BevelMesh>,
        snapshot: String,
    }

    fn solve_corner(name: &str, settings: &BevelSettings) -> Result<SolvedCorner, String> {
        let request = settings.to_request().map_err(|e| e.to_string())?;
        let (result, diag) = solve_with_diagnostics(&request);
        let mesh = bevel_face(&request, &result).map(|face| face.to_mesh());

        let snapshot = snapshot(name, |out| {
            write_request(out, &request);
            write_result(out, &result);
            write_diagnostics(out, &diag);
            match mesh.as_ref() {
                Some(mesh) => write_mesh(out, mesh),
                None => {
                    let _ = writeln!(out, "mesh none");
                }
            }
        });

        Ok(SolvedCorner {
            name: name.to_owned(),
            request,
            result,
            diag,
            mesh,
            snapshot,
        })
    }

    fn emit(corner: &SolvedCorner, output: &OutputOptions) -> Result<(), String> {
        if let Some(dir) = output.out_dir.as_deref() {
            if output.obj_path.is_some() || output.snap_path.is_some() {
                return Err("use either --out-dir or --obj/--snap (not both)".to_string());
            }
            return write_to_dir(corner, dir, output.overwrite);
        }

        if let Some(path) = output.snap_path.as_deref() {
            write_text_file(path, &corner.snapshot, output.overwrite)?;
            eprintln!("wrote {}", path.display());
        } else {
            print!("{}", corner.snapshot);
        }

        if let Some(path) = output.obj_path.as_deref() {
            let mesh = corner
                .mesh
                .as_ref()
                .ok_or_else(|| format!("{}: corner is degenerate, no face to write", corner.name))?;
            write_obj_file(path, mesh, &corner.name, output.overwrite)?;
            eprintln!("wrote {}", path.display());
        }

        report(corner);
        Ok(())
    }

    fn write_to_dir(corner: &SolvedCorner, dir: &Path, overwrite: bool) -> Result<(), String> {
        fs::create_dir_all(dir).map_err(|e| format!("create out dir: {e}"))?;

        let snap = dir.join(format!("{}.snap", corner.name));
        write_text_file(&snap, &corner.snapshot, overwrite)?;
        eprintln!("wrote {}", snap.display());

        if let Some(mesh) = corner.mesh.as_ref() {
            let obj = dir.join(format!("{}.obj", corner.name));
            write_obj_file(&obj, mesh, &corner.name, overwrite)?;
            eprintln!("wrote {}", obj.display());
        }

        report(corner);
        Ok(())
    }

    fn report(corner: &SolvedCorner) {
        eprintln!(
            "{}: points={} degenerate={} aligned={} offset={} segments={}",
            corner.name,
            corner.result.arc_points.len(),
            corner.diag.degenerate,
            corner.diag.plane_aligned,
            corner.request.offset,
            corner.request.segments
        );
    }

    fn unknown_scenario(name: &str) -> String {
        let mut msg = format!("unknown scenario `{name}`\n\navailable scenarios:\n");
        for scenario in Scenario::ALL {
            let _ = writeln!(msg, "  {}", scenario.name());
        }
        msg
    }

    fn write_text_file(path: &Path, text: &str, overwrite: bool) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }
        fs::write(path, normalize_snapshot_text(text))
            .map_err(|e| format!("write {}: {e}", path.display()))
    }

    fn write_obj_file(
        path: &Path,
        mesh: &BevelMesh,
        name: &str,
        overwrite: bool,
    ) -> Result<(), String> {
        if path.exists() && !overwrite {
            return Err(format!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            ));
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("create dir {}: {e}", parent.display()))?;
        }

        let file = File::create(path).map_err(|e| format!("create {}: {e}", path.display()))?;
        let mut w = BufWriter::new(file);

        writeln!(w, "# corner-bevel bevel_cli").map_err(|e| format!("write obj: {e}"))?;
        writeln!(w, "o {name}").map_err(|e| format!("write obj: {e}"))?;
        for p in &mesh.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2]).map_err(|e| format!("write obj: {e}"))?;
        }
        for [a, b, c] in mesh.triangles() {
            writeln!(w, "f {} {} {}", a + 1, b + 1, c + 1).map_err(|e| format!("write obj: {e}"))?;
        }

        w.flush().map_err(|e| format!("flush {}: {e}", path.display()))
    }

    pub(crate) fn normalize_snapshot_text(text: &str) -> String {
        let normalized = text.replace("\r\n", "\n");
        if normalized.ends_with('\n') {
            normalized
        } else {
            format!("{normalized}\n")
        }
    }

    pub(crate) fn quantize_f64(value: f64) -> f64 {
        if !value.is_finite() {
            return value;
        }
        let q = (value / SNAPSHOT_QUANTIZE).round() * SNAPSHOT_QUANTIZE;
        // Collapse -0.0 so snapshots stay stable across sign noise.
        if q == 0.0 { 0.0 } else { q }
    }

    fn write_f64(out: &mut String, value: f64) {
        let value = quantize_f64(value);
        let _ = write!(out, "{value:.prec$}", prec = SNAPSHOT_DECIMALS);
    }

    pub(crate) fn write_vec3_line(out: &mut String, prefix: &str, v: [f64; 3]) {
        let _ = write!(out, "{prefix} ");
        write_f64(out, v[0]);
        out.push(' ');
        write_f64(out, v[1]);
        out.push(' ');
        write_f64(out, v[2]);
        out.push('\n');
    }

    fn write_request(out: &mut String, request: &BevelRequest) {
        write_vec3_line(out, "request.anchor", request.anchor.to_array());
        write_vec3_line(out, "request.side_b", request.side_b.to_array());
        write_vec3_line(out, "request.side_c", request.side_c.to_array());
        let _ = write!(out, "request.offset ");
        write_f64(out, request.offset);
        out.push('\n');
        let _ = writeln!(out, "request.segments {}", request.segments);
    }

    fn write_result(out: &mut String, result: &BevelResult) {
        write_vec3_line(out, "result.p1", result.p1.to_array());
        write_vec3_line(out, "result.p2", result.p2.to_array());
        write_vec3_line(out, "result.pivot", result.pivot.to_array());
        write_vec3_line(out, "result.normal", result.plane_normal.to_array());
        let _ = writeln!(out, "result.arc_points {}", result.arc_points.len());
        for p in &result.arc_points {
            write_vec3_line(out, "a", p.to_array());
        }
    }

    fn write_diagnostics(out: &mut String, diag: &BevelDiagnostics) {
        let _ = writeln!(out, "diag.degenerate {}", diag.degenerate);
        let _ = writeln!(out, "diag.plane_aligned {}", diag.plane_aligned);
        let _ = writeln!(out, "diag.shear_fallback {}", diag.shear_fallback);
        let _ = write!(out, "diag.axis_angle ");
        write_f64(out, diag.axis_angle);
        out.push('\n');
        let _ = write!(out, "diag.shear_factor ");
        write_f64(out, diag.shear_factor);
        out.push('\n');
        let _ = write!(out, "diag.scale ");
        write_f64(out, diag.scale[0]);
        out.push(' ');
        write_f64(out, diag.scale[1]);
        out.push('\n');
        let _ = writeln!(out, "diag.warning_count {}", diag.warnings.len());
        for (idx, warning) in diag.warnings.iter().enumerate() {
            let _ = writeln!(out, "diag.warning.{idx} {warning}");
        }
    }

    fn write_mesh(out: &mut String, mesh: &BevelMesh) {
        let _ = writeln!(out, "mesh.vertex_count {}", mesh.vertex_count());
        let _ = writeln!(out, "mesh.triangle_count {}", mesh.triangle_count());
        for p in &mesh.positions {
            write_vec3_line(out, "p", *p);
        }
        for [a, b, c] in mesh.triangles() {
            let _ = writeln!(out, "i {a} {b} {c}");
        }
    }

    pub(crate) fn snapshot(op: &str, sections: impl FnOnce(&mut String)) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "# corner-bevel golden v1");
        let _ = writeln!(out, "op {op}");
        let _ = writeln!(out, "quantize {SNAPSHOT_QUANTIZE:.1e}");
        sections(&mut out);
        normalize_snapshot_text(&out)
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) enum Scenario {
        RightCorner,
        SkewedCorner,
        ObtuseCorner,
        FlippedNormal,
        TiltedPlane,
        Collinear,
    }

    impl Scenario {
        pub(crate) const ALL: &'static [Scenario] = &[
            Scenario::RightCorner,
            Scenario::SkewedCorner,
            Scenario::ObtuseCorner,
            Scenario::FlippedNormal,
            Scenario::TiltedPlane,
            Scenario::Collinear,
        ];

        pub(crate) fn name(self) -> &'static str {
            match self {
                Scenario::RightCorner => "right_corner",
                Scenario::SkewedCorner => "skewed_corner",
                Scenario::ObtuseCorner => "obtuse_corner",
                Scenario::FlippedNormal => "flipped_normal",
                Scenario::TiltedPlane => "tilted_plane",
                Scenario::Collinear => "collinear",
            }
        }

        pub(crate) fn from_str(name: &str) -> Option<Self> {
            Self::ALL.iter().copied().find(|scenario| scenario.name() == name)
        }

        fn settings(self) -> BevelSettings {
            let base = BevelSettings::default();
            match self {
                Scenario::RightCorner => base,
                Scenario::SkewedCorner => BevelSettings {
                    side_c: [2.0, 3.0, 0.0],
                    offset: 1.0,
                    ..base
                },
                Scenario::ObtuseCorner => BevelSettings {
                    side_c: [-3.0, 1.0, 0.0],
                    offset: 0.8,
                    segments: 12,
                    ..base
                },
                Scenario::FlippedNormal => BevelSettings {
                    side_b: [0.0, 4.0, 0.0],
                    side_c: [4.0, 0.0, 0.0],
                    ..base
                },
                Scenario::TiltedPlane => BevelSettings {
                    anchor: [1.0, 2.0, 3.0],
                    side_b: [5.0, -1.0, 7.0],
                    side_c: [-2.0, 4.0, 0.5],
                    offset: 1.2,
                    segments: 6,
                    ..base
                },
                Scenario::Collinear => BevelSettings {
                    side_b: [2.0, 0.0, 0.0],
                    side_c: [4.0, 0.0, 0.0],
                    offset: 1.0,
                    ..base
                },
            }
        }
    }

    struct Args {
        args: Vec<String>,
        pos: usize,
    }

    impl Args {
        fn new(args: Vec<String>) -> Self {
            Self { args, pos: 0 }
        }

        fn next(&mut self) -> Option<String> {
            let arg = self.args.get(self.pos)?.clone();
            self.pos += 1;
            Some(arg)
        }

        fn value(&mut self, flag: &str) -> Result<String, String> {
            self.next()
                .ok_or_else(|| format!("missing value for {flag}"))
        }
    }

}
