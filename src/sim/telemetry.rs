use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use super::{CarBody, FRONT_LEFT, FRONT_RIGHT};
use crate::error::SimResult;

/// One row of per-tick car telemetry, all in the car frame
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    pub pos: [f32; 3],
    pub vel: [f32; 3],
    pub acc: [f32; 3],
    pub speed: f32,
    /// Roll, pitch, yaw
    pub ang: [f32; 3],
    pub ang_vel: [f32; 3],
    pub ang_acc: [f32; 3],
    pub steer_cmd: f32,
    pub wheel_steer_right: f32,
    pub wheel_steer_left: f32,
    pub accel_cmd: f32,
    pub brake_cmd: f32,
    pub clutch_cmd: f32,
    pub gear_cmd: i32,
}

impl TelemetryRecord {
    pub const COLUMNS: [&'static str; 26] = [
        "pos_X",
        "pos_Y",
        "pos_Z",
        "vel_X",
        "vel_Y",
        "vel_Z",
        "acl_X",
        "acl_Y",
        "acl_Z",
        "velocity",
        "roll_X",
        "pitch_Y",
        "yaw_Z",
        "roll_X_rate",
        "pitch_Y_rate",
        "yaw_Z_rate",
        "roll_X_acl",
        "pitch_Y_acl",
        "yaw_Z_acl",
        "steerCmd",
        "wheel_rgt",
        "wheel_lft",
        "aclCmd",
        "brakeCmd",
        "clutchCmd",
        "gearCmd",
    ];

    #[must_use]
    pub fn from_body(body: &CarBody) -> Self {
        let gc = &body.dyn_gc;
        Self {
            pos: gc.pos.lin.to_array(),
            vel: gc.vel.lin.to_array(),
            acc: gc.acc.lin.to_array(),
            speed: body.speed,
            ang: gc.pos.ang.to_array(),
            ang_vel: gc.vel.ang.to_array(),
            ang_acc: gc.acc.ang.to_array(),
            steer_cmd: body.controls.steer,
            wheel_steer_right: body.wheels[FRONT_RIGHT].steer,
            wheel_steer_left: body.wheels[FRONT_LEFT].steer,
            accel_cmd: body.controls.accel,
            brake_cmd: body.controls.brake,
            clutch_cmd: body.controls.clutch,
            gear_cmd: body.controls.gear,
        }
    }

    /// Writes the record as one comma-separated line, in `COLUMNS` order
    pub fn write_csv<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let reals = self
            .pos
            .iter()
            .chain(&self.vel)
            .chain(&self.acc)
            .chain([&self.speed])
            .chain(&self.ang)
            .chain(&self.ang_vel)
            .chain(&self.ang_acc)
            .chain([
                &self.steer_cmd,
                &self.wheel_steer_right,
                &self.wheel_steer_left,
                &self.accel_cmd,
                &self.brake_cmd,
                &self.clutch_cmd,
            ]);

        for value in reals {
            write!(out, "{value},")?;
        }
        writeln!(out, "{}", self.gear_cmd)
    }
}

/// Receives one telemetry record per simulated car per tick
pub trait TelemetrySink {
    fn write_record(&mut self, car: usize, record: &TelemetryRecord) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// One CSV stream per car slot, each starting with a header row
pub struct CsvTelemetry<W: Write> {
    outputs: Vec<W>,
}

impl<W: Write> CsvTelemetry<W> {
    /// Wraps the per-car outputs and writes the header row to each
    pub fn new(mut outputs: Vec<W>) -> io::Result<Self> {
        let header = TelemetryRecord::COLUMNS.join(",");
        for out in &mut outputs {
            writeln!(out, "{header}")?;
        }
        Ok(Self { outputs })
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<W> {
        self.outputs
    }
}

impl CsvTelemetry<BufWriter<File>> {
    /// Creates `<dir>/<slot>.csv` for every car slot
    pub fn create(dir: impl AsRef<Path>, num_cars: usize) -> SimResult<Self> {
        let dir = dir.as_ref();
        let outputs = (0..num_cars)
            .map(|i| File::create(dir.join(format!("{i}.csv"))).map(BufWriter::new))
            .collect::<io::Result<Vec<_>>>()?;
        Ok(Self::new(outputs)?)
    }
}

impl<W: Write> TelemetrySink for CsvTelemetry<W> {
    fn write_record(&mut self, car: usize, record: &TelemetryRecord) -> io::Result<()> {
        let Some(out) = self.outputs.get_mut(car) else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no telemetry output for car {car}"),
            ));
        };
        record.write_csv(out)
    }

    fn flush(&mut self) -> io::Result<()> {
        for out in &mut self.outputs {
            out.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_rows_have_the_same_width() {
        let mut telemetry = CsvTelemetry::new(vec![Vec::new(), Vec::new()]).unwrap();
        let record = TelemetryRecord {
            pos: [1.0, 2.0, 0.5],
            speed: 12.5,
            accel_cmd: 1.0,
            gear_cmd: -1,
            ..Default::default()
        };
        telemetry.write_record(1, &record).unwrap();

        let outputs = telemetry.into_inner();
        let first = String::from_utf8(outputs[0].clone()).unwrap();
        assert_eq!(first.lines().count(), 1);

        let second = String::from_utf8(outputs[1].clone()).unwrap();
        let lines: Vec<&str> = second.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("pos_X,pos_Y,pos_Z,"));
        assert!(lines[0].ends_with(",clutchCmd,gearCmd"));

        let fields: Vec<&str> = lines[1].split(',').collect();
        assert_eq!(fields.len(), TelemetryRecord::COLUMNS.len());
        assert_eq!(fields[0], "1");
        assert_eq!(fields[9], "12.5");
        assert_eq!(fields[22], "1");
        assert_eq!(fields[25], "-1");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let dir = std::env::temp_dir().join("racesim-telemetry-missing").join("nested");
        assert!(matches!(
            CsvTelemetry::create(&dir, 2),
            Err(crate::error::SimError::Io(_))
        ));
    }

    #[test]
    fn unknown_car_is_an_error() {
        let mut telemetry = CsvTelemetry::new(vec![Vec::new()]).unwrap();
        assert!(telemetry.write_record(3, &TelemetryRecord::default()).is_err());
    }
}
