//! 심볼 유니버스.
//!
//! 한 번의 실행에서 순회하는 종목 목록입니다. 순서를 유지하며 중복을 제거하고,
//! 생성 후에는 변경되지 않습니다. 전역 상수가 아니라 파이프라인에 주입되는
//! 값이므로 테스트에서 작은 유니버스를 쉽게 구성할 수 있습니다.

use std::collections::HashSet;
use std::path::Path;

use crate::{CoreError, CoreResult, Symbol};

/// 순서가 유지되는 중복 없는 심볼 목록.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolUniverse {
    symbols: Vec<Symbol>,
}

impl SymbolUniverse {
    /// 심볼 목록으로 유니버스를 생성합니다 (첫 등장만 유지).
    pub fn new(symbols: impl IntoIterator<Item = Symbol>) -> Self {
        let mut seen = HashSet::new();
        let symbols = symbols
            .into_iter()
            .filter(|s| seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    /// 쉼표/공백/줄바꿈으로 구분된 목록을 파싱합니다.
    ///
    /// `#` 이후는 주석으로 무시합니다.
    pub fn parse_list(input: &str) -> CoreResult<Self> {
        let symbols = input
            .lines()
            .map(|line| line.split('#').next().unwrap_or_default())
            .flat_map(|line| line.split(|c: char| c == ',' || c.is_whitespace()))
            .filter(|token| !token.is_empty())
            .map(Symbol::new)
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self::new(symbols))
    }

    /// 파일에서 유니버스를 로드합니다.
    pub fn from_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let universe = Self::parse_list(&content)?;
        if universe.is_empty() {
            return Err(CoreError::Universe(format!(
                "심볼 파일이 비어 있습니다: {}",
                path.display()
            )));
        }
        Ok(universe)
    }

    /// 기본 제공 유니버스 (TSX Venture `.V` + CSE `.CN`).
    pub fn default_universe() -> Self {
        Self::new(
            DEFAULT_SYMBOLS
                .iter()
                .filter_map(|s| Symbol::new(*s).ok()),
        )
    }

    /// 심볼 수.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// 비어 있는지 확인.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// 순서대로 순회.
    pub fn iter(&self) -> std::slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }
}

impl<'a> IntoIterator for &'a SymbolUniverse {
    type Item = &'a Symbol;
    type IntoIter = std::slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}

/// Yahoo Finance에서 조회 가능한 TSX Venture / CSE 종목.
const DEFAULT_SYMBOLS: &[&str] = &[
    "ARH.V", "ALTU.V", "ATLE.V", "BGE.V", "BLU.V", "SPI.V", "CCEC.V", "CTA.V", "CFY.V", "CEQ.V",
    "EW.V", "FHR.V", "GX.V", "HAM.V", "HPL.V", "LTX.V", "LNGE.V", "LTC.V", "LCX.V", "MAH.V",
    "MCF.V", "NZ.V", "NGY.V", "ORC-B.V", "PFC.V", "PCQ.V", "VRY.V", "PTC.V", "STMP.V", "SKK.V",
    "TPC.V", "TGH.V", "TTG.V", "VTX.V", "WGT.V", "XL.V", "ADYA.V", "AIVC.V", "GPUS.V", "AUUA.V",
    "SAT.V", "BRN-PA.V", "BCF.V", "CSOC-A.V", "CSOC-B.V", "CYF.V", "CAI.V", "CAG.V", "FFP.V",
    "CTH.V", "DTEA.V", "DWS.V", "DLC.V", "DPF.V", "ELM.V", "ESBL.V", "FDI.V", "FCA-U.V", "FW.V",
    "FORT.V", "FA.V", "FP.V", "FRSH.V", "GRF.V", "GUF.V", "HFC.V", "HILL.V", "ICRS.V", "IMPT.V",
    "IGP.V", "IPD.V", "KDA.V", "VAND.V", "MNC.V", "MNX.V", "MAP.V", "ALFA-UN.V", "MAR-UN.V",
    "MIVO.V", "MNLX.V", "NXG.V", "NXLV.V", "NFD-A.V", "OC.V", "OML.V", "PALI.V", "PVF-UN.V",
    "PRH.V", "PTFY.V", "POOL.V", "BRED.V", "RRR-UN.V", "RGI.V", "RFX.V", "RPP.V", "RUM.V",
    "RMB.V", "HASH.V", "SSX.V", "SNI-PA.V", "SQG.V", "SSA.V", "SPP.V", "SCPT-U.V", "SURF-A.V",
    "SGE.V", "SUGR.V", "SRES.V", "YAY.V", "TORR.V", "TRBR.V", "GYM.V", "USS.V", "UIG.V", "WI.V",
    "WP.V", "YEG.V", "EFF.V", "ABA.V", "ABM.V", "ACDC.V", "ADE.V", "ADY.V", "ALTN.V", "AERO.V",
    "AFR.V", "AML.V", "AEMC.V", "ALM.V", "AORO.V", "ATI.V", "AVX.V", "ALT.V", "AWM.V", "ANTL.V",
    "APX.V", "APMI.V", "ARJN.V", "ACS.V", "AWX.V", "AGAG.V", "ASL.V", "RBZ.V", "ATOM.V",
    "AUGC.V", "AUQ.V", "RES.V", "ARL.V", "AGLD.V", "AVR.V", "AXO.V", "AZR.V", "AZT.V", "BLDS.V",
    "BGS.V", "FIND.V", "BAT.V", "BMV.V", "BMR.V", "BM.V", "B.V", "BGF.V", "BFM.V", "BST.V",
    "BIGT.V", "BMM.V", "BAG.V", "BOCA.V", "BOL.V", "BNZ.V", "BOGO.V", "BONE.V", "BRON.V",
    "ZLTO.V", "BGD.V", "BWR.V", "CONE.V", "CCMI.V", "CAN.V", "CAF.V", "CLV.V", "CDA.V", "CRB.V",
    "CGD.V", "CPI.V", "RUSH.V", "CASA.V", "CCD.V", "CTG.V", "CIO.V", "CERT.V", "CDPR.V",
    "CBA.V", "CBG.V", "TRAN.V", "CTV.V", "CZZ.V", "CLUS.V", "CLIC.V", "CVB.V", "CQR.V", "CLM.V",
    "CRD.V", "CUEX.V", "CNCO.V", "COSA.V", "CSG.V", "CYG.V", "DTWO.V", "DGC.V", "DFR.V",
    "DNO.V", "DHR.V", "DCY.V", "DLP.V", "DMCU.V", "DRY.V", "DYG.V", "ETU.V", "EDM.V", "EGR.V",
    "EML.V", "ELY.V", "EP.V", "ENEV.V", "EAU.V", "EGM.V", "EON.V", "REE.V", "EOX.V", "EVX.V",
    "EXN.V", "EXG.V", "FAIR.V", "FLCN.V", "FMN.V", "FINX.V", "FAS.V", "FAN.V", "FCI.V", "FNM.V",
    "FTZ.V", "FEX.V", "FKM.V", "FTJ.V", "FMT.V", "FMM.V", "FTUR.V", "GETT.V", "GRI.V", "GEN.V",
    "GTC.V", "GGL.V", "GGX.V", "GLAD.V", "CUCU.V", "GXX.V", "HART.V", "GLB.V", "AUX.V", "GDP.V",
    "GLDN.V", "GDX.V", "GOFL.V", "GGA.V", "GHL.V", "GSTM.V", "GPM.V", "GPAC.V", "GPS.V",
    "GMI.V", "VGN.V", "GRL.V", "FIN.V", "GSPR.V", "GT.V", "GUN.V", "GYA.V", "HPM.V", "HANS.V",
    "HPY.V", "HAWK.V", "HAY.V", "HHH.V", "HWY.V", "ESPN.V", "HLU.V", "IMC.V", "IDEX.V", "IRI.V",
    "INFD.V", "INFM.V", "INFI.V", "MINE.V", "ICON.V", "IMM.V", "IZZ.V", "IRO.V", "INTR.V",
    "IZN.V", "JTWO.V", "JADE.V", "JDN.V", "JHC.V", "JZR.V", "KAPA.V", "KIB.V", "KCP.V", "KNG.V",
    "KLDC.V", "KSM.V", "KRI.V", "KRY.V", "LAB.V", "LG.V", "LWR.V", "LMS.V", "LEGY.V", "LIB.V",
    "LMG.V", "ROAR.V", "LOD.V", "LPK.V", "LUXR.V", "MT.V", "MDM.V", "MGMA.V", "MGI.V", "MARV.V",
    "MCM-A.V", "MFL.V", "MAX.V", "MLO.V", "MSC.V", "MMM.V", "MHI.V", "MINK.V", "MSG.V", "MOG.V",
    "MON.V", "MNRG.V", "MOO.V", "MCC.V", "MUN.V", "NTX.V", "NVLH.V", "NED.V", "ENRG.V", "NTB.V",
    "NEXM.V", "NICN.V", "NCP.V", "NIO.V", "NOAL.V", "NOBL.V", "NVT.V", "NSU.V", "NL.V", "NMC.V",
    "FEO.V", "OLV.V", "ONYX.V", "OPTG.V", "OOR.V", "ORCL.V", "PBM.V", "PPM.V", "PDQ.V",
    "PGDC.V", "PAT.V", "PEGA.V", "PINN.V", "PJX.V", "PLA.V", "PWRO.V", "PPX.V", "HDRO.V",
    "PMX.V", "PGX.V", "PHD.V", "PTX.V", "PWH.V", "QTWO.V", "QCX.V", "QGR.V", "QRO.V", "LEAP.V",
    "Q.V", "QURI.V", "RAK.V", "RMO.V", "RAMP.V", "RNCH.V", "RTH.V", "REC.V", "RGC.V", "RAGE.V",
    "RSM.V", "REVX.V", "RYE.V", "RMD.V", "RMI.V", "RLYG.V", "RJX-A.V", "RCT.V", "RTE.V",
    "RTM.V", "SAGA.V", "SAGE.V", "SLG.V", "SCD.V", "SCY.V", "SAF.V", "SGZ.V", "SEND.V",
    "SHRP.V", "SIEN.V", "SVG.V", "SPD.V", "AGA.V", "SXL.V", "SMRV.V", "SDCU.V", "SGO.V",
    "SAO.V", "SPMC.V", "SGQ.V", "SML.V", "SRQ.V", "SRC.V", "STUD.V", "STRM.V", "SMD.V", "SR.V",
    "SDR.V", "STUV.V", "PEAK.V", "SUI.V", "SYG.V", "TWO.V", "RARE.V", "TRO.V", "TKU.V",
    "TORA.V", "TES.V", "TGX.V", "MAC.V", "BIRD.V", "TIN.V", "TORC.V", "TTS.V", "TBLL.V",
    "TGC.V", "TBK.V", "TCO.V", "TFM.V", "TRS.V", "TRBC.V", "TG.V", "TR.V", "TSD.V", "URZ.V",
    "VMXX.V", "VAX.V", "VCV.V", "VLX.V", "VMET.V", "VLD.V", "VIZ.V", "VCT.V", "VMS.V", "WLR.V",
    "WRI.V", "WGF.V", "WPG.V", "WGLD.V", "WMS.V", "WKG.V", "WMK.V", "WSK.V", "GIG.V", "XPLR.V",
    "XXIX.V", "ZBNI.V", "ZNX.V", "ZAU.V", "ZON.V", "BQE.V", "KLX.V", "CTEK.V", "FWTC.V",
    "FCLI.V", "HEMP.V", "IBAT.V", "COO.V", "SPRQ.V", "SUN.V", "WEB.V", "AWI.V", "AGET.V",
    "AISX.V", "AMT.V", "ARGH.V", "AST.V", "BECN.V", "SWAN.V", "MATE.V", "BTV.V", "BILD.V",
    "WPR.V", "CCDS.V", "WAGR.V", "CNS.V", "CUB.V", "CYBE.V", "DAR.V", "MKT.V", "DFSC.V",
    "DGX.V", "ENA.V", "EPF.V", "FTRC.V", "GOK.V", "GOOD.V", "HIDE.V", "ICGH.V", "ID.V",
    "INEO.V", "INX.V", "INIK.V", "JJ.V", "JTC.V", "KDOZ.V", "DDD.V", "MIM.V", "MIT.V", "BET.V",
    "PVIS.V", "KEEK.V", "PTEC.V", "XBOT.V", "SBIO.V", "SPZ.V", "THP.V", "TTGI.V", "VIP.V",
    "VITA.V", "YTY.V", "XCYT.V", "XTAO-U.V", "ZMA.V", "FRED.V", "AJA.V", "ARC.V", "BGA.V",
    "EKG.V", "CSPN.V", "CHER.V", "CNVI.V", "CYTO.V", "GSD.V", "OKAI.V", "EVMT.V", "FREQ.V",
    "GENX.V", "WOLF.V", "NURS.V", "IDL.V", "IOT.V", "KOVO.V", "JUMP.V", "LSL.V", "MDX.V",
    "NSCI.V", "NAV.V", "NPTH.V", "NGMD.V", "NRX.V", "PCRX.V", "QPT.V", "RKV.V", "SHRX.V",
    "SBM.V", "TTI.V", "VPI.V", "VVTM.V", "WAVE.V", "ZCT.V", "ZYUS.V", "HPSS.CN", "KLN.CN",
    "NUE.CN", "RGEN.CN", "RGX.CN", "APKI.CN", "ADPT.CN", "BVOF-A.CN", "BVOF-B.CN", "BKTS.CN",
    "BKS.CN", "BRCH.CN", "BHCC.CN", "BTC.PR.A.CN", "CISC.CN", "CLDV.CN", "CODE-X.CN", "DATT.CN",
    "GCA-X.CN", "HYLQ.CN", "MESC.CN", "METX.CN", "MBAI.CN", "MOSS.CN", "MYCO.CN", "NURL.CN",
    "VFI-X.CN", "ORNG.CN", "LOAN.CN", "PLTH-WT.CN", "REK-U.CN", "RI.CN", "SPLY.CN", "SKY.CN",
    "SNDL.CN", "CRIT.CN", "TLP-UN.CN", "AITT.CN", "TWOH-X.CN", "LFG.CN", "URB-A.CN", "VICE.CN",
    "WSM-X.CN", "ZOG-X.CN", "AAWH-U.CN", "CURE-X.CN", "NIC.CN", "DCNN.CN", "FNT-U.CN", "FGH.CN",
    "HERB.CN", "JOLT.CN", "VTAL.CN", "MBIO.CN", "MTLC.CN", "AIAI.CN", "MUSL.CN", "QNTM.CN",
    "TRUL-NTU.CN", "VREO.CN", "JJJ.CN", "AMQ.CN", "ADDY.CN", "ADON.CN", "AUEX.CN", "AFF.CN",
    "ACM.CN", "NUKE.CN", "ACRE.CN", "KCLI.CN", "USLI.CN", "TUNG.CN", "AWCM.CN", "ANDC.CN",
    "ANT.CN", "ATMY.CN", "APXC.CN", "ARGL.CN", "ARMY.CN", "AUMC.CN", "AGC.CN", "AVM-X.CN",
    "AVE.CN", "AA.CN", "BAR.CN", "BATX.CN", "BYRG.CN", "BGX.CN", "BBRD.CN", "BLST.CN",
    "BGLD.CN", "BRS.CN", "CSQ.CN", "BRAZ.CN", "CASC.CN", "CMET.CN", "CMP.CN", "COMT.CN",
    "CQX.CN", "CSR.CN", "CUH.CN", "CRTL.CN", "CRPC.CN", "CRVC-X.CN", "CUPA.CN", "BATT.CN",
    "DEMC.CN", "EPR.CN", "ER.CN", "EAGL.CN", "WISE.CN", "EVM.CN", "PHOS.CN", "FRG.CN",
    "FOMO.CN", "FREE.CN", "BOOM.CN", "GMC.CN", "BFG.CN", "BFG-WT.B.CN", "BFG-WTA.CN", "GSTR.CN",
    "MONI.CN", "GURN.CN", "GC.CN", "GDN.CN", "GCC.CN", "GLDR.CN", "GFT.CN", "GRBM.CN", "GXP.CN",
    "HARD.CN", "HERC.CN", "HZ.CN", "HLND.CN", "HRK.CN", "ISP.CN", "INTG.CN", "KING.CN",
    "KOG.CN", "KBX.CN", "LAI-X.CN", "LFNT.CN", "LIBR.CN", "LINE.CN", "LEO.CN", "LIVE.CN",
    "MBL.CN", "KENY.CN", "MAXM.CN", "MLM.CN", "MERC.CN", "METL.CN", "MSM.CN", "MMET.CN",
    "MILI.CN", "ROAD.CN", "MY.CN", "MEC.CN", "M.CN", "NATB.CN", "NTMC.CN", "NOP.CN", "EATH.CN",
    "PATH.CN", "NEXX.CN", "NXU-X.CN", "NEXU.CN", "NIX.CN", "NVPC.CN", "NUKV.CN", "OMGA.CN",
    "PSIL.CN", "PURR.CN", "PGA.CN", "PGR.CN", "PLTO.CN", "PMAX.CN", "PRCG.CN", "PRNC.CN",
    "GRUV.CN", "QMET.CN", "TIM-X.CN", "QB.CN", "QIMC.CN", "QREE.CN", "QQQ.CN", "REDC.CN",
    "RUU.CN", "RECE.CN", "RSG.CN", "SK.CN", "RB.CN", "SALI.CN", "SCU.CN", "SEAG-X.CN",
    "SEEM.CN", "SHOW.CN", "SI.CN", "SRS.CN", "SPRK.CN", "SRAN.CN", "STCU.CN", "SLO.CN",
    "STMN.CN", "SUU.CN", "SUR.CN", "TMIN.CN", "TCEC.CN", "CACR.CN", "CACR-A.CN", "TRM.CN",
    "TONE.CN", "UE.CN", "USCM.CN", "UUU.CN", "VRDN.CN", "VLTA.CN", "VRTX.CN", "WSR.CN",
    "XRI.CN", "YMC.CN", "ZEUS.CN", "AETH.CN", "ALEN.U.CN", "ANON.CN", "BRH.CN", "BSKY.CN",
    "TNJ.CN", "BPAI.CN", "CLTE.CN", "CTTT.CN", "DWTZ.CN", "DTR.CN", "KAS.CN", "PLUG.CN",
    "ENRT.CN", "XBLK.X.CN", "FDM.X.CN", "FNDX.CN", "WERX.CN", "AICO.CN", "AIG.CN", "ROBO.CN",
    "HYPE.CN", "ISTK.CN", "JIVA.CN", "LITS.CN", "METG.CN", "LABZ.CN", "NEWS.CN", "NXT.CN",
    "PXE.CN", "STIF.CN", "PLAS.CN", "AIDR.CN", "SHLF.CN", "SPAI.CN", "SPTZ.CN", "SBTC.CN",
    "STKT.CN", "QBTQ.CN", "SYAI.CN", "TGGL.CN", "TWEL.CN", "WRUN.CN", "WIN.CN", "WISR.CN",
    "VRAI.CN", "UGH.CN",
];
